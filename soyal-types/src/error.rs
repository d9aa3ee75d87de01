pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Card address {address} out of range 0..={max}")]
    AddressOutOfRange {
        address: u16,
        max: u16,
    },
}
