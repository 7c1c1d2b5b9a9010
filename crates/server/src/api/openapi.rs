//! OpenAPI/Utoipa configuration.

use crate::api::{applications::APPLICATIONS_TAG, health::MISC_TAG};
use crate::config::DEFAULT_OWNER_HEADER;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityRequirement, SecurityScheme},
};

/// Name of the security scheme referenced by the application endpoints.
pub const CALLER_IDENTITY_SCHEME: &str = "CallerIdentity";

/// Security addon for OpenAPI documentation.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    #[tracing::instrument(skip(self, openapi))]
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        // Set by the authenticating proxy; the header name is configurable
        let caller = ApiKey::Header(ApiKeyValue::with_description(
            DEFAULT_OWNER_HEADER,
            "Account id of the authenticated caller, injected by the upstream proxy.",
        ));
        components.add_security_scheme(CALLER_IDENTITY_SCHEME, SecurityScheme::ApiKey(caller));

        // Every operation needs a caller unless it opts out with `security(())`
        openapi.security = Some(vec![SecurityRequirement::new(
            CALLER_IDENTITY_SCHEME,
            Vec::<String>::new(),
        )]);
    }
}

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "OAuth2 Application Registry API",
        version = "1.0.0",
        description = "Register and manage OAuth2 client applications owned by an account."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = APPLICATIONS_TAG, description = "OAuth2 client application endpoints")
    )
)]
pub struct ApiDoc;
