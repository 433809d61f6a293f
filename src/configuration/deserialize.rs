pub mod duration {
    use crate::time::timeunit::parse_duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_duration(value.as_str()).map_err(|err| D::Error::custom(err.to_string()))
    }
}
