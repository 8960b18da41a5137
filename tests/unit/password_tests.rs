// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for password hashing and requirements
use linkhub_backend_lib::auth::{PasswordRequirements, PasswordVault};
use linkhub_backend_lib::validation::{validate_password, ValidationError};

#[test]
fn test_password_hashing_and_verification() {
    let vault = PasswordVault::with_cost(4).unwrap();
    let password = "SecureP@ssw0rd";
    let hash = vault.hash(password).unwrap();

    assert_ne!(password, hash);
    assert!(vault.verify(password, &hash));
    assert!(!vault.verify("SecureP@ssw0rd!", &hash));
    assert!(!vault.verify(password, "$scrypt$garbage"));
}

#[test]
fn test_distinct_passwords_never_cross_verify() {
    let vault = PasswordVault::with_cost(4).unwrap();
    let passwords = ["secret1", "secret2", "Secret1", "secret1 ", "пароль123"];
    let hashes: Vec<String> = passwords.iter().map(|p| vault.hash(p).unwrap()).collect();

    for (i, password) in passwords.iter().enumerate() {
        for (j, hash) in hashes.iter().enumerate() {
            assert_eq!(vault.verify(password, hash), i == j, "{password:?} vs hash #{j}");
        }
    }
}

#[test]
fn test_password_requirements() {
    let requirements = PasswordRequirements::default();

    assert!(validate_password("secret", &requirements).is_ok());
    assert!(validate_password("SecureP@ssw0rd", &requirements).is_ok());
    assert_eq!(
        validate_password("short", &requirements),
        Err(ValidationError::PasswordTooShort(requirements.min_length))
    );

    let strict = PasswordRequirements {
        min_length: 10,
        require_uppercase: true,
        require_lowercase: true,
        require_digit: true,
        require_special: true,
    };

    assert!(validate_password("SecureP@ssw0rd", &strict).is_ok());
    assert_eq!(
        validate_password("Short1!", &strict),
        Err(ValidationError::PasswordTooShort(10))
    );
    for weak in ["securep@ssw0rd", "SECUREP@SSW0RD", "SecureP@ssword", "SecurePassw0rd"] {
        assert!(
            matches!(validate_password(weak, &strict), Err(ValidationError::WeakPassword(_))),
            "{weak}"
        );
    }
}
