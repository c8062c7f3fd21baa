pub mod common;

mod vendor_client_flow;
