use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::domain::status::{check_barcode_scannable, check_scannable};
use crate::domain::{BarcodeStatus, BillStatus, DomainError};
use crate::errors::AppError;
use crate::handlers::bills::BillResponse;
use crate::identity::{load_person, staff_id_from_request};
use crate::models::barcode::Barcode;
use crate::models::bill::Bill;
use crate::schema::{barcodes, bills};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    pub code: String,
}

/// POST /scan
///
/// The handheld-scanner workflow: one physical scan completes the pending
/// bill behind the code and consumes the barcode. Checks run in strict
/// order and short-circuit; the barcode row is locked first so concurrent
/// scans of the same code serialize.
#[utoipa::path(
    post,
    path = "/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Bill completed, barcode used", body = BillResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Barcode or bill not found"),
        (status = 409, description = "Barcode not active, bill already completed or cancelled"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "scan"
)]
pub async fn scan(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    body: web::Json<ScanRequest>,
) -> Result<HttpResponse, AppError> {
    let staff_id = staff_id_from_request(&req)?;
    let code = body.into_inner().code;

    let bill = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<Bill, DomainError, _>(|conn| {
            let actor = load_person(conn, staff_id)?;

            // 1. Barcode lookup, locked for the rest of the transaction.
            let barcode: Barcode = barcodes::table
                .filter(barcodes::code.eq(&code))
                .select(Barcode::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::BarcodeNotFound)?;

            // 2. Only an active barcode can be scanned; a used one reports
            //    the completed bill behind it.
            check_barcode_scannable(BarcodeStatus::parse(&barcode.status)?)?;

            // 3. The bill behind the code.
            let bill: Bill = bills::table
                .filter(bills::code.eq(&code))
                .select(Bill::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::BillNotFound)?;

            // 4. Pending completes; completed and cancelled are conflicts.
            check_scannable(BillStatus::parse(&bill.status)?)?;

            let completed: Bill = diesel::update(bills::table.filter(bills::id.eq(bill.id)))
                .set((
                    bills::status.eq(BillStatus::Completed.as_str()),
                    bills::modified_by.eq(actor.id),
                    bills::modified_date.eq(Utc::now()),
                ))
                .returning(Bill::as_returning())
                .get_result(conn)?;

            diesel::update(barcodes::table.filter(barcodes::id.eq(barcode.id)))
                .set((
                    barcodes::status.eq(BarcodeStatus::Used.as_str()),
                    barcodes::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            Ok(completed)
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(BillResponse::from(bill)))
}
