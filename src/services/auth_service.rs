use crate::middleware::error_handling::{AppError, Result};
use crate::middleware::JwtService;
use crate::models::user::{CreateUserRequest, LoginRequest, UserResponse, UserRole};
use crate::repositories::{PreferenceRepository, UserRepository};

pub struct AuthService {
    user_repo: UserRepository,
    preference_repo: PreferenceRepository,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        preference_repo: PreferenceRepository,
        jwt_secret: &str,
    ) -> Self {
        Self {
            user_repo,
            preference_repo,
            jwt_service: JwtService::new(jwt_secret),
        }
    }

    pub async fn register(&self, request: CreateUserRequest) -> Result<(UserResponse, String)> {
        if self.user_repo.email_exists(&request.email).await? {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
        let user = self.user_repo.create(&request, &password_hash).await?;

        // suppliers start with an unconfigured (match-everything) record
        if user.role == UserRole::Supplier {
            self.preference_repo.create_empty(user.id).await?;
        }

        let token = self
            .jwt_service
            .generate_token(user.id, &user.email, &user.name, user.role)?;

        tracing::info!("New user registered: {} ({:?})", user.id, user.role);

        Ok((user.into(), token))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<(UserResponse, String)> {
        let user = self
            .user_repo
            .find_by_email(&request.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !bcrypt::verify(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self
            .jwt_service
            .generate_token(user.id, &user.email, &user.name, user.role)?;

        Ok((user.into(), token))
    }
}
