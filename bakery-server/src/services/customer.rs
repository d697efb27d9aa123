//! Customer accounts and login

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Customer, CustomerUpdate, LoginRequest, LoginResponse, NewCustomer, RegisterRequest, Role,
};

use crate::auth::CurrentCustomer;
use crate::db::StoreError;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(state: &AppState, req: RegisterRequest) -> ServiceResult<Customer> {
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&req.address, "address", MAX_ADDRESS_LEN)?;

    if state.store.customer_by_email(&email).await?.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateEmail).into());
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::internal("Failed to hash password")
    })?;

    let data = NewCustomer {
        email,
        password_hash,
        name: req.name.trim().to_string(),
        address: req.address,
        role: Role::Customer,
    };
    let customer = match state.store.insert_customer(&data, state.clock.now_millis()).await {
        Ok(c) => c,
        Err(StoreError::UniqueViolation(_)) => {
            return Err(AppError::new(ErrorCode::DuplicateEmail).into());
        }
        Err(e) => return Err(ServiceError::from(e)),
    };

    tracing::info!(customer_id = customer.id, "Customer registered");
    Ok(customer)
}

pub async fn login(state: &AppState, req: LoginRequest) -> ServiceResult<LoginResponse> {
    let email = normalize_email(&req.email);
    let Some(customer) = state.store.customer_by_email(&email).await? else {
        return Err(AppError::invalid_credentials().into());
    };
    if !verify_password(&req.password, &customer.password_hash) {
        tracing::warn!(customer_id = customer.id, "Login with wrong password");
        return Err(AppError::invalid_credentials().into());
    }

    let (token, expires_at) = state
        .jwt
        .generate_token(&customer, state.clock.now())
        .map_err(|e| {
            tracing::error!(error = %e, "Token generation failed");
            AppError::internal("Failed to issue token")
        })?;

    Ok(LoginResponse {
        token,
        expires_at,
        customer,
    })
}

pub async fn me(state: &AppState, who: &CurrentCustomer) -> ServiceResult<Customer> {
    Ok(state
        .store
        .customer_by_id(who.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?)
}

pub async fn update_me(
    state: &AppState,
    who: &CurrentCustomer,
    req: CustomerUpdate,
) -> ServiceResult<Customer> {
    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&req.address, "address", MAX_ADDRESS_LEN)?;

    Ok(state
        .store
        .update_customer(who.id, &req, state.clock.now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
