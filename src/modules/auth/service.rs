use campusmart_auth::{TokenPair, TokenService};
use campusmart_core::{AppError, hash_password, verify_password};
use campusmart_db::UserStore;
use campusmart_models::{
    AuthResponse, LoginRequest, NewUser, RegisterRequestDto, User, UserRole, VerifiedIdentity,
};
use campusmart_observability::{track_login, track_token_refresh, track_user_registered};
use tracing::{info, instrument, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService;

impl AuthService {
    /// Creates a student account and signs it in.
    ///
    /// The email check spans soft-deleted accounts as well, so a deleted
    /// address cannot be registered again.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn register_user(
        users: &dyn UserStore,
        tokens: &TokenService,
        dto: RegisterRequestDto,
    ) -> Result<AuthResponse, AppError> {
        if users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = users
            .insert(NewUser {
                email: dto.email,
                password_hash: Some(password_hash),
                google_id: None,
                name: dto.name,
                phone_number: dto.phone_number,
                campus: dto.campus,
                hostel: dto.hostel,
                role: UserRole::Student,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        track_user_registered("password");

        Self::sign_in(tokens, user)
    }

    /// Password login. Every failure reads the same so the response does not
    /// reveal which accounts exist.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn login_user(
        users: &dyn UserStore,
        tokens: &TokenService,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let user = users
            .find_by_email(&dto.email)
            .await?
            .filter(|user| !user.is_deleted);

        let Some(user) = user else {
            warn!("Login for unknown or deleted account");
            track_login("failure");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let Some(hash) = user.password_hash.as_deref() else {
            warn!(user_id = %user.id, "Password login attempted on a Google-only account");
            track_login("failure");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&dto.password, hash)? {
            warn!(user_id = %user.id, "Wrong password");
            track_login("failure");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        track_login("success");
        Self::sign_in(tokens, user)
    }

    #[instrument(skip_all)]
    pub async fn refresh_tokens(
        users: &dyn UserStore,
        tokens: &TokenService,
        refresh_token: &str,
    ) -> Result<TokenPair, AppError> {
        let result = tokens.rotate(refresh_token, users).await;
        track_token_refresh(if result.is_ok() { "success" } else { "failure" });
        result
    }

    /// Finds or creates the account behind a provider-verified identity.
    ///
    /// Lookup goes by provider id first, then by email, in which case the
    /// provider id is linked to the existing account.
    #[instrument(skip_all, fields(email = %identity.email))]
    pub async fn oauth_login(
        users: &dyn UserStore,
        tokens: &TokenService,
        identity: VerifiedIdentity,
    ) -> Result<TokenPair, AppError> {
        let existing = match users.find_by_google_id(&identity.provider_id).await? {
            Some(user) => Some(user),
            None => users.find_by_email(&identity.email).await?,
        };

        let user = match existing {
            Some(user) if user.is_deleted => {
                warn!(user_id = %user.id, "Google sign-in for a deleted account");
                return Err(AppError::unauthorized("Account has been deactivated".to_string()));
            }
            Some(user) if user.google_id.is_none() => {
                users.link_google_id(user.id, &identity.provider_id).await?
            }
            Some(user) => user,
            None => {
                let user = users
                    .insert(NewUser {
                        name: identity.name,
                        google_id: Some(identity.provider_id),
                        ..NewUser::student(identity.email, None)
                    })
                    .await?;
                info!(user_id = %user.id, "User registered through Google");
                track_user_registered("google");
                user
            }
        };

        tokens
            .issue_token_pair(user.id, user.token_version)
            .map_err(|e| e.into_app_error("Failed to issue tokens"))
    }

    /// Revokes every token issued to `user` so far.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn logout_all(users: &dyn UserStore, user: &User) -> Result<(), AppError> {
        users.bump_token_version(user.id).await?;
        info!("All sessions revoked");
        Ok(())
    }

    pub(crate) fn sign_in(tokens: &TokenService, user: User) -> Result<AuthResponse, AppError> {
        let pair = tokens
            .issue_token_pair(user.id, user.token_version)
            .map_err(|e| e.into_app_error("Failed to issue tokens"))?;

        Ok(AuthResponse {
            user,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }
}
