//! Field lifecycle rules: uniqueness, required fields, style propagation targets.

use certkit_core::{DesignerError, DuplicateKind, RequiredField};

use crate::model::{CredentialKind, Field};

/// The uniqueness class a field belongs to, if any.
pub fn duplicate_kind(field: &Field) -> Option<DuplicateKind> {
    if field.is_email() {
        Some(DuplicateKind::Email)
    } else if field.is_qr_code() {
        Some(DuplicateKind::QrCode)
    } else if field.is_issue_date() {
        Some(DuplicateKind::IssueDate)
    } else if field.is_expiry_date() {
        Some(DuplicateKind::ExpiryDate)
    } else {
        None
    }
}

/// Rejects `candidate` when another field (different id) already occupies its
/// uniqueness class.
pub fn check_unique<'a>(
    existing: impl IntoIterator<Item = &'a Field>,
    candidate: &Field,
) -> Result<(), DesignerError> {
    let Some(kind) = duplicate_kind(candidate) else {
        return Ok(());
    };
    let clash = existing
        .into_iter()
        .any(|f| f.id != candidate.id && duplicate_kind(f) == Some(kind));
    if clash {
        tracing::debug!("Rejected duplicate {} field '{}'", kind, candidate.name);
        return Err(DesignerError::DuplicateField { kind });
    }
    Ok(())
}

/// Requirements not met by `fields`, in display order.
pub fn missing_required(fields: &[Field], credential_kind: CredentialKind) -> Vec<RequiredField> {
    let mut missing = Vec::new();
    if !fields.iter().any(Field::is_email) {
        missing.push(RequiredField::Email);
    }
    if credential_kind.requires_name() && !fields.iter().any(Field::is_name_field) {
        missing.push(RequiredField::Name);
    }
    if !fields.iter().any(Field::is_issue_date) {
        missing.push(RequiredField::IssueDate);
    }
    missing
}

/// Save gate over [`missing_required`].
pub fn validate_for_save(
    fields: &[Field],
    credential_kind: CredentialKind,
) -> Result<(), DesignerError> {
    let missing = missing_required(fields, credential_kind);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DesignerError::MissingRequiredField { missing })
    }
}
