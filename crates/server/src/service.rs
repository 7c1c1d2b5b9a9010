//! Application service: the create/list/get/update/delete contract.
//!
//! Every operation validates its input, resolves ownership through the guard
//! and talks to the repository in a single atomic step.

use std::sync::Arc;

use crate::config::DEFAULT_MAX_CLIENT_ID_ATTEMPTS;
use crate::credentials::{CredentialGenerator, SecureCredentialGenerator, verify_client_secret};
use crate::dto::{
    ApplicationView, CreateApplicationOptions, CreatedApplication, UpdateApplicationOptions,
};
use crate::entity::oauth2_application;
use crate::error::{ApplicationError, RepositoryError};
use crate::guard::{self, Caller};
use crate::repository::{ApplicationMutation, ApplicationRepository, NewApplication};
use crate::validation::{ValidationError, validate_name, validate_redirect_uris};

pub struct ApplicationService {
    repository: Arc<dyn ApplicationRepository>,
    generator: Arc<dyn CredentialGenerator>,
    max_client_id_attempts: u32,
}

impl ApplicationService {
    pub fn new(
        repository: Arc<dyn ApplicationRepository>,
        generator: Arc<dyn CredentialGenerator>,
        max_client_id_attempts: u32,
    ) -> Self {
        Self {
            repository,
            generator,
            max_client_id_attempts: max_client_id_attempts.max(1),
        }
    }

    /// Service with the secure generator and the default retry bound.
    pub fn with_repository(repository: Arc<dyn ApplicationRepository>) -> Self {
        Self::new(
            repository,
            Arc::new(SecureCredentialGenerator),
            DEFAULT_MAX_CLIENT_ID_ATTEMPTS,
        )
    }

    /// Register a new application and reveal its secret, once.
    #[tracing::instrument(skip(self, caller, options), fields(owner_id = %caller.owner_id))]
    pub async fn create(
        &self,
        caller: &Caller,
        options: CreateApplicationOptions,
    ) -> Result<CreatedApplication, ApplicationError> {
        let name = validate_name(&options.name)?;
        let redirect_uris = validate_redirect_uris(&options.redirect_uris)?;
        let (client_secret, client_secret_hash) =
            self.generator.new_client_secret()?.into_parts();

        for attempt in 1..=self.max_client_id_attempts {
            let application = NewApplication {
                owner_id: caller.owner_id.clone(),
                name: name.clone(),
                client_id: self.generator.new_client_id(),
                client_secret_hash: client_secret_hash.clone(),
                redirect_uris: redirect_uris.clone(),
            };

            match self.repository.create(application).await {
                Ok(record) => {
                    tracing::info!(
                        application_id = record.id,
                        client_id = %record.client_id,
                        "Registered OAuth2 application"
                    );
                    return Ok(CreatedApplication::new(record, client_secret));
                }
                Err(RepositoryError::Conflict) => {
                    tracing::warn!(attempt, "Generated client id already issued, retrying");
                }
                Err(e) => {
                    tracing::error!("Failed to store OAuth2 application: {}", e);
                    return Err(e.into());
                }
            }
        }

        tracing::error!(
            attempts = self.max_client_id_attempts,
            "Gave up issuing a unique client id"
        );
        Err(ApplicationError::Exhausted {
            attempts: self.max_client_id_attempts,
        })
    }

    /// All applications the caller owns, oldest first, secrets omitted.
    #[tracing::instrument(skip(self, caller), fields(owner_id = %caller.owner_id))]
    pub async fn list(&self, caller: &Caller) -> Result<Vec<ApplicationView>, ApplicationError> {
        let records = self.repository.list_by_owner(&caller.owner_id).await?;
        Ok(records
            .into_iter()
            .filter(|record| guard::authorize(caller, record))
            .map(ApplicationView::from)
            .collect())
    }

    #[tracing::instrument(skip(self, caller), fields(owner_id = %caller.owner_id))]
    pub async fn get(&self, caller: &Caller, id: i64) -> Result<ApplicationView, ApplicationError> {
        let record = self.repository.get_by_id_and_owner(id, caller).await?;
        Ok(record.into())
    }

    /// Replace the name and/or the whole redirect URI list.
    #[tracing::instrument(skip(self, caller, options), fields(owner_id = %caller.owner_id))]
    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        options: UpdateApplicationOptions,
    ) -> Result<ApplicationView, ApplicationError> {
        let mutation = ApplicationMutation {
            name: options.name.as_deref().map(validate_name).transpose()?,
            redirect_uris: options
                .redirect_uris
                .as_deref()
                .map(validate_redirect_uris)
                .transpose()?,
        };
        if mutation.is_empty() {
            return Err(ValidationError::new(
                "body",
                "at least one of name or redirect_uris must be provided",
            )
            .into());
        }

        if carries_immutable_fields(&options) {
            let current = self.repository.get_by_id_and_owner(id, caller).await?;
            check_immutable_fields(&options, &current)?;
        }

        let record = self.repository.update(id, caller, mutation).await?;
        tracing::info!(application_id = record.id, "Updated OAuth2 application");
        Ok(record.into())
    }

    /// Permanently remove an application. A second delete reports `NotFound`.
    #[tracing::instrument(skip(self, caller), fields(owner_id = %caller.owner_id))]
    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), ApplicationError> {
        self.repository.delete_by_id_and_owner(id, caller).await?;
        tracing::info!(application_id = id, "Deleted OAuth2 application");
        Ok(())
    }
}

fn carries_immutable_fields(options: &UpdateApplicationOptions) -> bool {
    options.client_id.is_some() || options.client_secret.is_some() || options.created_at.is_some()
}

/// Immutable fields may be echoed back, but never changed.
///
/// `created_at` is compared at second precision since stores differ in how
/// much sub-second precision they keep.
fn check_immutable_fields(
    options: &UpdateApplicationOptions,
    current: &oauth2_application::Model,
) -> Result<(), ValidationError> {
    if options
        .client_id
        .as_ref()
        .is_some_and(|client_id| client_id != &current.client_id)
    {
        return Err(ValidationError::new("client_id", "client_id cannot be changed"));
    }
    if options
        .client_secret
        .as_deref()
        .is_some_and(|secret| !verify_client_secret(secret, &current.client_secret_hash))
    {
        return Err(ValidationError::new(
            "client_secret",
            "client_secret cannot be changed",
        ));
    }
    if options
        .created_at
        .is_some_and(|created_at| created_at.unix_timestamp() != current.created_at.unix_timestamp())
    {
        return Err(ValidationError::new(
            "created_at",
            "created_at cannot be changed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CLIENT_ID_LEN, CLIENT_SECRET_LEN, ClientSecret};
    use crate::error::CredentialError;
    use crate::repository::MemoryApplicationRepository;
    use std::sync::Mutex;

    /// Hands out client ids from a script, then falls back to random ones.
    struct ScriptedGenerator {
        client_ids: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(client_ids: &[&str]) -> Self {
            Self {
                client_ids: Mutex::new(client_ids.iter().rev().map(|s| s.to_string()).collect()),
            }
        }
    }

    impl CredentialGenerator for ScriptedGenerator {
        fn new_client_id(&self) -> String {
            self.client_ids
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| SecureCredentialGenerator.new_client_id())
        }

        fn new_client_secret(&self) -> Result<ClientSecret, CredentialError> {
            SecureCredentialGenerator.new_client_secret()
        }
    }

    const TAKEN: &str = "11111111-1111-4111-8111-111111111111";

    fn service(repo: Arc<MemoryApplicationRepository>) -> ApplicationService {
        ApplicationService::with_repository(repo)
    }

    fn create_options(name: &str, uris: &[&str]) -> CreateApplicationOptions {
        CreateApplicationOptions {
            name: name.into(),
            redirect_uris: uris.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_reveals_secret_once() {
        let repo = Arc::new(MemoryApplicationRepository::new());
        let service = service(repo.clone());
        let caller = Caller::new("user-2");

        let created = service
            .create(&caller, create_options("test-app-1", &["http://www.google.com"]))
            .await
            .expect("create");

        assert_eq!(created.name, "test-app-1");
        assert_eq!(created.client_id.len(), CLIENT_ID_LEN);
        assert_eq!(created.client_secret.len(), CLIENT_SECRET_LEN);
        assert_eq!(created.redirect_uris, vec!["http://www.google.com"]);

        let stored = repo
            .get_by_id_and_owner(created.id, &caller)
            .await
            .expect("stored");
        assert_ne!(stored.client_secret_hash, created.client_secret);
        assert!(verify_client_secret(
            &created.client_secret,
            &stored.client_secret_hash
        ));

        let listed = service.list(&caller).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].client_id, created.client_id);
    }

    #[tokio::test]
    async fn create_retries_on_client_id_collision() {
        let repo = Arc::new(MemoryApplicationRepository::new());
        repo.reserve_client_id(TAKEN).await;
        let service = ApplicationService::new(
            repo.clone(),
            Arc::new(ScriptedGenerator::new(&[TAKEN, TAKEN])),
            3,
        );

        let created = service
            .create(&Caller::new("owner"), create_options("app", &["https://a.example"]))
            .await
            .expect("third attempt succeeds");
        assert_ne!(created.client_id, TAKEN);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn create_gives_up_after_bounded_attempts() {
        let repo = Arc::new(MemoryApplicationRepository::new());
        repo.reserve_client_id(TAKEN).await;
        let service = ApplicationService::new(
            repo.clone(),
            Arc::new(ScriptedGenerator::new(&[TAKEN, TAKEN, TAKEN])),
            3,
        );

        let err = service
            .create(&Caller::new("owner"), create_options("app", &["https://a.example"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Exhausted { attempts: 3 }));
        assert!(!err.is_client_error());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let repo = Arc::new(MemoryApplicationRepository::new());
        let service = service(repo.clone());
        let caller = Caller::new("owner");

        let err = service
            .create(&caller, create_options("app", &[]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Validation(ValidationError { field: "redirect_uris", .. })
        ));

        let err = service
            .create(&caller, create_options("", &["https://a.example"]))
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        assert!(service.list(&caller).await.unwrap().is_empty());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_ordered() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let alice = Caller::new("alice");
        let bob = Caller::new("bob");

        let first = service
            .create(&alice, create_options("first", &["https://a.example"]))
            .await
            .unwrap();
        service
            .create(&bob, create_options("bobs", &["https://b.example"]))
            .await
            .unwrap();
        let second = service
            .create(&alice, create_options("second", &["https://a.example"]))
            .await
            .unwrap();

        let listed = service.list(&alice).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|app| app.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(service.list(&bob).await.unwrap().len(), 1);
        assert!(service.list(&Caller::new("carol")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_and_missing_records_look_the_same() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let owner = Caller::new("owner");
        let stranger = Caller::new("stranger");
        let created = service
            .create(&owner, create_options("app", &["https://a.example"]))
            .await
            .unwrap();

        let update = UpdateApplicationOptions {
            name: Some("hijacked".into()),
            ..Default::default()
        };

        for id in [created.id, created.id + 1000] {
            assert!(matches!(
                service.get(&stranger, id).await,
                Err(ApplicationError::NotFound)
            ));
            assert!(matches!(
                service.update(&stranger, id, update.clone()).await,
                Err(ApplicationError::NotFound)
            ));
            assert!(matches!(
                service.delete(&stranger, id).await,
                Err(ApplicationError::NotFound)
            ));
        }

        assert_eq!(service.get(&owner, created.id).await.unwrap().name, "app");
    }

    #[tokio::test]
    async fn update_replaces_redirect_uris_in_order() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let caller = Caller::new("owner");
        let created = service
            .create(&caller, create_options("test-app-1", &["http://www.google.com"]))
            .await
            .unwrap();

        let updated = service
            .update(
                &caller,
                created.id,
                UpdateApplicationOptions {
                    redirect_uris: Some(vec![
                        "http://www.google.com/".into(),
                        "http://www.github.com/".into(),
                    ]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "test-app-1");
        assert_eq!(updated.client_id, created.client_id);

        let fetched = service.get(&caller, created.id).await.unwrap();
        assert_eq!(
            fetched.redirect_uris,
            vec!["http://www.google.com/", "http://www.github.com/"]
        );
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_rejects_changed_immutable_fields() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let caller = Caller::new("owner");
        let created = service
            .create(&caller, create_options("app", &["https://a.example"]))
            .await
            .unwrap();

        let err = service
            .update(
                &caller,
                created.id,
                UpdateApplicationOptions {
                    name: Some("renamed".into()),
                    client_id: Some(TAKEN.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Validation(ValidationError { field: "client_id", .. })
        ));

        let err = service
            .update(
                &caller,
                created.id,
                UpdateApplicationOptions {
                    name: Some("renamed".into()),
                    client_secret: Some("guessed-secret".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Validation(ValidationError { field: "client_secret", .. })
        ));

        assert_eq!(service.get(&caller, created.id).await.unwrap().name, "app");
    }

    #[tokio::test]
    async fn update_accepts_echoed_immutable_fields() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let caller = Caller::new("owner");
        let created = service
            .create(&caller, create_options("app", &["https://a.example"]))
            .await
            .unwrap();

        let updated = service
            .update(
                &caller,
                created.id,
                UpdateApplicationOptions {
                    name: Some("renamed".into()),
                    client_id: Some(created.client_id.clone()),
                    client_secret: Some(created.client_secret.clone()),
                    created_at: Some(created.created_at),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
    }

    #[tokio::test]
    async fn update_requires_a_change() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let caller = Caller::new("owner");
        let created = service
            .create(&caller, create_options("app", &["https://a.example"]))
            .await
            .unwrap();

        let err = service
            .update(&caller, created.id, UpdateApplicationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));

        let err = service
            .update(
                &caller,
                created.id,
                UpdateApplicationOptions {
                    redirect_uris: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
        assert_eq!(
            service.get(&caller, created.id).await.unwrap().redirect_uris,
            vec!["https://a.example"]
        );
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let service = service(Arc::new(MemoryApplicationRepository::new()));
        let caller = Caller::new("owner");
        let created = service
            .create(&caller, create_options("app", &["https://a.example"]))
            .await
            .unwrap();

        service.delete(&caller, created.id).await.expect("first delete");
        assert!(matches!(
            service.delete(&caller, created.id).await,
            Err(ApplicationError::NotFound)
        ));
        assert!(matches!(
            service.get(&caller, created.id).await,
            Err(ApplicationError::NotFound)
        ));
    }
}
