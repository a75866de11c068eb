use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RecreateParams {
    /// Evaluate non-empty routes on the other available vehicles too.
    pub vehicle_switch: bool,
}

impl Default for RecreateParams {
    fn default() -> Self {
        RecreateParams {
            vehicle_switch: true,
        }
    }
}
