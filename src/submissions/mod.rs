//! Form submissions
//!
//! Validate a visitor's form, store it, render it as an email and deliver
//! it by the configured path.

pub mod delivery;
pub mod email;
pub mod forms;

pub use delivery::{mailto_url, DeliveryReceipt, SubmissionDelivery};
pub use email::compose;
pub use forms::{BookingRequest, ContactEnquiry, JobApplication, SubmissionForm};

use serde::Serialize;
use tracing::{error, info};

use crate::database::models::SubmissionKind;
use crate::database::{Database, Queries};
use crate::error::SiteResult;

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub id: String,
    pub kind: SubmissionKind,
    pub delivery: DeliveryReceipt,
}

/// Validate, store, then deliver. The stored row is kept when delivery
/// fails; no retry is attempted.
pub async fn submit<F: SubmissionForm>(
    database: &Database,
    delivery: &SubmissionDelivery,
    form: &F,
) -> SiteResult<SubmissionReceipt> {
    form.validate()?;

    let payload = serde_json::to_value(form)?;
    let stored =
        Queries::insert_submission(database.pool(), F::KIND, &payload, form.job_listing_id())
            .await?;
    info!("Stored {} submission {}", F::KIND.as_str(), stored.id);

    let message = compose(form);
    let receipt = delivery.deliver(&message).await.map_err(|e| {
        error!("Submission {} was stored but not delivered: {}", stored.id, e);
        e
    })?;

    Ok(SubmissionReceipt {
        id: stored.id,
        kind: F::KIND,
        delivery: receipt,
    })
}
