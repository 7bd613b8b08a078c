use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::bills;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = bills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Bill {
    pub id: Uuid,
    pub code: String,
    pub customer_name: String,
    pub date_issued: DateTime<Utc>,
    pub amount: BigDecimal,
    pub issue_location: String,
    pub issued_by: Uuid,
    pub vehicle_number: String,
    pub material: String,
    pub destination: String,
    pub vehicle_size: String,
    pub region: String,
    pub eta: DateTime<Utc>,
    pub status: String,
    pub remark: Option<String>,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bills)]
pub struct NewBill {
    pub id: Uuid,
    pub code: String,
    pub customer_name: String,
    pub amount: BigDecimal,
    pub issue_location: String,
    pub issued_by: Uuid,
    pub vehicle_number: String,
    pub material: String,
    pub destination: String,
    pub vehicle_size: String,
    pub region: String,
    pub eta: DateTime<Utc>,
    pub status: String,
    pub remark: Option<String>,
}

/// Partial update applied by PATCH /bills/{id}. `None` fields are left alone;
/// `date_issued` and `issued_by` are immutable and deliberately absent.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = bills)]
pub struct BillChangeset {
    pub customer_name: Option<String>,
    pub amount: Option<BigDecimal>,
    pub issue_location: Option<String>,
    pub vehicle_number: Option<String>,
    pub material: Option<String>,
    pub destination: Option<String>,
    pub vehicle_size: Option<String>,
    pub region: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub remark: Option<String>,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<DateTime<Utc>>,
}
