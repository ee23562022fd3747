use std::sync::OnceLock;

use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::parent::{LoginResponse, NewParent, Parent, ProfileUpdate},
    services::auth::AuthService,
};

pub const FAMILY_CODE_PREFIX: &str = "SAFE";
pub const FAMILY_CODE_LEN: usize = 8;

/// Registration gives up after this many family-code collisions in a row.
const FAMILY_CODE_ATTEMPTS: usize = 5;

const FAMILY_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `SAFE-` followed by 8 random upper-case base-36 characters.
pub fn generate_family_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..FAMILY_CODE_LEN)
        .map(|_| FAMILY_CODE_ALPHABET[rng.gen_range(0..FAMILY_CODE_ALPHABET.len())] as char)
        .collect();
    format!("{FAMILY_CODE_PREFIX}-{suffix}")
}

pub fn is_family_code(code: &str) -> bool {
    match code.split_once('-') {
        Some((prefix, suffix)) => {
            prefix == FAMILY_CODE_PREFIX
                && suffix.len() == FAMILY_CODE_LEN
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        }
        None => false,
    }
}

/// Hash checked against when the email is unknown. Built once, at the cost
/// of the first login that needs it.
fn dummy_hash(cost: u32) -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| {
        AuthService::hash_password("safeguard-no-such-parent", cost).unwrap_or_default()
    })
}

pub struct ParentService;

impl ParentService {
    /// Create a parent account. The email pre-check is only a fast path: the
    /// UNIQUE constraints on `email` and `family_code` decide the outcome.
    pub async fn register(
        pool: &SqlitePool,
        new: &NewParent,
        bcrypt_cost: u32,
    ) -> AppResult<Parent> {
        if Self::find_by_email(pool, &new.email).await?.is_some() {
            warn!("Registration rejected, email already registered: {}", new.email);
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = AuthService::hash_password(&new.password, bcrypt_cost)?;
        let parent = Self::insert(pool, new, &password_hash, generate_family_code).await?;
        info!("Parent registered with ID: {}", parent.id);
        Ok(parent)
    }

    /// Inserts the row, drawing a fresh family code from `next_code` each time
    /// the family-code constraint fires.
    async fn insert(
        pool: &SqlitePool,
        new: &NewParent,
        password_hash: &str,
        mut next_code: impl FnMut() -> String,
    ) -> AppResult<Parent> {
        for attempt in 1..=FAMILY_CODE_ATTEMPTS {
            let family_code = next_code();
            let inserted = sqlx::query_as::<_, Parent>(
                "INSERT INTO parents (name, last_name, email, password_hash, family_code, phone_number, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)
                 RETURNING *",
            )
            .bind(&new.name)
            .bind(&new.last_name)
            .bind(&new.email)
            .bind(password_hash)
            .bind(&family_code)
            .bind(&new.phone_number)
            .bind(Utc::now())
            .fetch_one(pool)
            .await;

            match inserted {
                Ok(parent) => return Ok(parent),
                Err(e) if is_unique_violation(&e, "parents.email") => {
                    warn!("Registration lost a race on email: {}", new.email);
                    return Err(AppError::conflict("Email already registered"));
                }
                Err(e) if is_unique_violation(&e, "parents.family_code") => {
                    warn!(
                        "Family code collision on {} (attempt {}/{})",
                        family_code, attempt, FAMILY_CODE_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(format!(
            "no unique family code after {FAMILY_CODE_ATTEMPTS} attempts"
        )))
    }

    /// Unknown email and wrong password produce the same error, and both pay
    /// for one bcrypt verification.
    pub async fn login(
        pool: &SqlitePool,
        email: &str,
        password: &str,
        bcrypt_cost: u32,
        jwt_secret: &str,
        ttl_days: u64,
    ) -> AppResult<LoginResponse> {
        let Some(parent) = Self::find_by_email(pool, email).await? else {
            AuthService::verify_password(password, dummy_hash(bcrypt_cost));
            return Err(AppError::invalid_credentials());
        };

        if !AuthService::verify_password(password, &parent.password_hash) {
            warn!("Failed login for parent {}", parent.id);
            return Err(AppError::invalid_credentials());
        }

        let token = AuthService::generate_session_token(&parent, jwt_secret, ttl_days)?;
        info!("Parent {} logged in", parent.id);

        Ok(LoginResponse {
            parent: parent.into(),
            token,
        })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>("SELECT * FROM parents WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(parent)
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>("SELECT * FROM parents WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(parent)
    }

    pub async fn find_by_family_code(
        pool: &SqlitePool,
        family_code: &str,
    ) -> AppResult<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>("SELECT * FROM parents WHERE family_code = ?")
            .bind(family_code)
            .fetch_optional(pool)
            .await?;
        Ok(parent)
    }

    pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<Parent>> {
        let parents = sqlx::query_as::<_, Parent>("SELECT * FROM parents ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(parents)
    }

    /// Overwrites the mutable profile fields. `None` when the parent does not exist.
    pub async fn update_profile(
        pool: &SqlitePool,
        id: i64,
        update: &ProfileUpdate,
    ) -> AppResult<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>(
            "UPDATE parents
             SET name = ?, last_name = ?, phone_number = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.last_name)
        .bind(&update.phone_number)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        if parent.is_some() {
            info!("Parent {} profile updated", id);
        }
        Ok(parent)
    }
}
