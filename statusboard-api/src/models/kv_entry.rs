use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};

use crate::schema::kv_entries;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = kv_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = kv_entries)]
pub struct NewKvEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub updated_at: NaiveDateTime,
}
