use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::barcodes;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = barcodes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Barcode {
    pub id: Uuid,
    pub code: String,
    pub status: String,
    pub assigned_to: Uuid,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub associated_bill: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = barcodes)]
pub struct NewBarcode {
    pub id: Uuid,
    pub code: String,
    pub status: String,
    pub assigned_to: Uuid,
    pub assigned_by: Uuid,
}
