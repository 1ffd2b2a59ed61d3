pub mod new_transfer;
pub mod transfers;
