pub mod oauth2_application;
pub mod oauth2_issued_client_id;
