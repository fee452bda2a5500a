use chrono::prelude::*;
use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn format_percent(progress: f32) -> String {
    format!("{}%", progress.round() as u32)
}

pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + Default + for<'de> Deserialize<'de>,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T> LocalSave for T
where
    T: StorageKey + Serialize,
{
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("failed to save {}: {:?}", T::KEY, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting_rounds_to_whole_numbers() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(41.7), "42%");
        assert_eq!(format_percent(100.0), "100%");
    }
}
