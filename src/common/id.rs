use serde::{Serialize, Serializer};
use std::fmt;

/// Opaque identity of a record within a batch.
///
/// Identities are random RFC4122 v4 GUIDs. They carry no ordering meaning;
/// batch order is kept by the store, not by the id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; 16]);

impl RecordId {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self(generate_guid_bytes())
    }

    /// Raw GUID bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_guid_braced(&self.0))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Generate a random RFC4122 v4 GUID as raw 16 bytes
pub fn generate_guid_bytes() -> [u8; 16] {
    let mut bytes: [u8; 16] = rand::random();
    // RFC4122 v4
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    bytes
}

/// Format raw GUID bytes as a braced string {XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}
pub fn format_guid_braced(bytes: &[u8; 16]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(38);
    out.push('{');
    for (i, b) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        // Writing into a String cannot fail
        let _ = write!(out, "{:02X}", b);
    }
    out.push('}');
    out
}
