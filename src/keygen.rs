use uuid::Uuid;

pub const KEY_LENGTH: usize = 12;

/// Source of license key strings. Uniqueness against the store is the
/// caller's concern.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Keys from a random v4 UUID, truncated to 12 hex digits and upper-cased
/// (e.g. `A1B2C3D4E5F6`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        generate_license_key()
    }
}

impl<F> KeyGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

pub fn generate_license_key() -> String {
    let mut key = Uuid::new_v4().simple().to_string();
    key.truncate(KEY_LENGTH);
    key.make_ascii_uppercase();
    key
}
