//! Gemeinsame Typen fuer das Kryptografie-Subsystem

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBytes(Vec<u8>);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for SecretBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Benannter Kandidaten-Schluessel im Schluesselring
#[derive(Debug, Clone)]
pub struct KeyEntry {
    /// Diagnose-Name (`default`, `custom-0`, ...)
    pub name: String,
    /// Basis-Schluessel vor der Kanal-Ableitung
    pub key: SecretBytes,
}

impl KeyEntry {
    pub fn new(name: impl Into<String>, key: impl Into<SecretBytes>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_bytes_debug_ist_redacted() {
        let s = SecretBytes::new(vec![0xAB; 16]);
        let debug = format!("{:?}", s);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
        assert_eq!(s.len(), 16);
    }

    #[test]
    fn key_entry_erstellen() {
        let entry = KeyEntry::new("custom-0", &b"0123456789abcdef"[..]);
        assert_eq!(entry.name, "custom-0");
        assert_eq!(entry.key.as_bytes(), b"0123456789abcdef");
    }
}
