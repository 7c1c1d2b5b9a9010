use goose::prelude::*;
use serde_json::{json, Value};
use std::env;

const APPLICATIONS: &str = "/api/v1/user/applications/oauth2";

fn owner_header() -> String {
    env::var("OWNER_HEADER").unwrap_or_else(|_| "x-authenticated-user".to_string())
}

/// Each simulated user acts as its own account.
fn owner_id(user: &GooseUser) -> String {
    format!("loadtest-user-{}", user.weighted_users_index)
}

async fn send_as_owner(
    user: &mut GooseUser,
    method: GooseMethod,
    path: &str,
    name: &str,
    body: Option<String>,
) -> Result<GooseResponse, Box<TransactionError>> {
    let owner = owner_id(user);
    let mut request_builder = user
        .get_request_builder(&method, path)?
        .header(owner_header().as_str(), owner.as_str());
    if let Some(body) = body {
        request_builder = request_builder
            .header("content-type", "application/json")
            .body(body);
    }

    let goose_request = GooseRequest::builder()
        .method(method)
        .path(path)
        .name(name)
        .set_request_builder(request_builder)
        .build();
    user.request(goose_request).await
}

async fn health_check(user: &mut GooseUser) -> TransactionResult {
    let _goose_metrics = user.get("/healthz").await?;
    Ok(())
}

async fn list_applications(user: &mut GooseUser) -> TransactionResult {
    let _goose_metrics =
        send_as_owner(user, GooseMethod::Get, APPLICATIONS, "list applications", None).await?;
    Ok(())
}

/// Create an application, read it back, then delete it.
async fn application_lifecycle(user: &mut GooseUser) -> TransactionResult {
    let body = json!({
        "name": "loadtest-app",
        "redirect_uris": ["https://loadtest.example.com/callback"],
    })
    .to_string();

    let mut goose = send_as_owner(
        user,
        GooseMethod::Post,
        APPLICATIONS,
        "create application",
        Some(body),
    )
    .await?;

    let id = match goose.response {
        Ok(response) => match response.text().await {
            Ok(text) => serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|value| value["id"].as_i64()),
            Err(_) => None,
        },
        Err(_) => None,
    };
    let Some(id) = id else {
        return user.set_failure(
            "create did not return an application id",
            &mut goose.request,
            None,
            None,
        );
    };

    let path = format!("{APPLICATIONS}/{id}");
    let _goose_metrics = send_as_owner(
        user,
        GooseMethod::Get,
        &path,
        "get application",
        None,
    )
    .await?;
    let _goose_metrics = send_as_owner(
        user,
        GooseMethod::Delete,
        &path,
        "delete application",
        None,
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), GooseError> {
    println!("Sending caller identity in header: {}", owner_header());

    GooseAttack::initialize()?
        .register_scenario(
            scenario!("HealthCheck").register_transaction(transaction!(health_check)),
        )
        .register_scenario(
            scenario!("ApplicationTests")
                .register_transaction(transaction!(list_applications).set_weight(3)?)
                .register_transaction(transaction!(application_lifecycle)),
        )
        .execute()
        .await?;

    Ok(())
}
