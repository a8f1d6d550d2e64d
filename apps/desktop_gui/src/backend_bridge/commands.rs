//! Backend commands queued from UI to backend worker.

use shared::domain::FormInput;

pub enum BackendCommand {
    Predict { fields: FormInput },
    Reset,
}
