use actix_session::Session;

use crate::error::PredictError;
use crate::result::ResultRecord;

const RESULT_KEY: &str = "prediction_results";

/// Typed access to the one value the session carries. Each successful
/// prediction overwrites the previous record.
pub struct ResultStore;

impl ResultStore {
    pub fn get(session: &Session) -> Option<ResultRecord> {
        session.get::<ResultRecord>(RESULT_KEY).ok().flatten()
    }

    pub fn set(session: &Session, record: &ResultRecord) -> Result<(), PredictError> {
        session
            .insert(RESULT_KEY, record)
            .map_err(|e| PredictError::Session(e.to_string()))
    }

    pub fn clear(session: &Session) {
        session.remove(RESULT_KEY);
    }
}
