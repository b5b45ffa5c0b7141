//! Check-ins, alerts and contacts.
//!
//! Their tables exist, but no behaviour has been defined for them yet: where a
//! check-in location comes from, who an alert reaches, how contacts are
//! edited. Each operation checks the session and then reports
//! `NotImplemented` rather than guessing.

use tracing::debug;

use safeguard_types::Feature;

use crate::error::{Result, ServiceError};
use crate::session::Session;

pub fn check_in(session: &Session) -> Result<()> {
    unavailable(session, Feature::CheckIn)
}

pub fn view_checkins(session: &Session) -> Result<()> {
    unavailable(session, Feature::ViewCheckins)
}

pub fn send_alert(session: &Session) -> Result<()> {
    unavailable(session, Feature::SendAlert)
}

pub fn view_alerts(session: &Session) -> Result<()> {
    unavailable(session, Feature::ViewAlerts)
}

pub fn manage_contacts(session: &Session) -> Result<()> {
    unavailable(session, Feature::ManageContacts)
}

fn unavailable(session: &Session, feature: Feature) -> Result<()> {
    let user_id = session.require_user()?;
    debug!(%user_id, "Requested unimplemented feature: {}", feature);
    Err(ServiceError::NotImplemented(feature))
}
