/// Opaque file contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn parse(payload: &[u8]) -> Self {
        Self::new(payload)
    }

    pub fn serialize(&self) -> &[u8] {
        &self.data
    }
}
