//! Entities shared by unit tests.
//!
//! `account` and `post` soft delete; `audit_log` is a plain table.

use crate::query::traits::{FromRow, LifeModelTrait, ModelTrait};
use crate::soft_delete::{HardDelete, SoftDelete, SoftDeleted};
use chrono::NaiveDateTime;
use may_postgres::Row;

pub struct Account;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountModel {
    pub id: i64,
    pub name: String,
    pub deleted_at: Option<NaiveDateTime>,
}

impl LifeModelTrait for Account {
    const TABLE_NAME: &'static str = "account";
    type Model = AccountModel;
    type PrimaryKey = i64;
    type Deletion = SoftDeleted;
}

impl ModelTrait for AccountModel {
    type Entity = Account;

    fn primary_key_value(&self) -> i64 {
        self.id
    }
}

impl FromRow for AccountModel {
    fn from_row(row: &Row) -> Result<Self, may_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

impl SoftDelete for AccountModel {
    fn deleted_at(&self) -> Option<NaiveDateTime> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, deleted_at: Option<NaiveDateTime>) {
        self.deleted_at = deleted_at;
    }
}

pub struct Post;

#[derive(Debug, Clone, PartialEq)]
pub struct PostModel {
    pub id: i64,
    pub account_id: i64,
    pub deleted_at: Option<NaiveDateTime>,
}

impl LifeModelTrait for Post {
    const TABLE_NAME: &'static str = "post";
    type Model = PostModel;
    type PrimaryKey = i64;
    type Deletion = SoftDeleted;
}

impl ModelTrait for PostModel {
    type Entity = Post;

    fn primary_key_value(&self) -> i64 {
        self.id
    }
}

impl FromRow for PostModel {
    fn from_row(row: &Row) -> Result<Self, may_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

pub struct AuditLog;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogModel {
    pub id: i64,
    pub account_id: i64,
}

impl LifeModelTrait for AuditLog {
    const TABLE_NAME: &'static str = "audit_log";
    type Model = AuditLogModel;
    type PrimaryKey = i64;
    type Deletion = HardDelete;
}

impl ModelTrait for AuditLogModel {
    type Entity = AuditLog;

    fn primary_key_value(&self) -> i64 {
        self.id
    }
}

impl FromRow for AuditLogModel {
    fn from_row(row: &Row) -> Result<Self, may_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
        })
    }
}
