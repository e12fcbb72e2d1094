use uuid::Uuid;

/// A fresh random identifier in lowercase hyphenated UUID form.
pub fn create_uuid() -> String {
    Uuid::new_v4().to_string()
}
