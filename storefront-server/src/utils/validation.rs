//! Input validation helpers
//!
//! Checks the route layer runs before handing input to the catalog store or
//! the order engine. Nothing here touches the database.

use shared::error::{AppError, ErrorCode};
use shared::models::{AddressInput, CategoryInput, OrderCreateInput, ProductInput};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category label, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, product stories
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: sku, phone, transaction id, currency, slugs
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Address lines
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a money amount: finite and not negative.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Postal codes are exactly six ASCII digits.
pub fn validate_postal_code(value: &str, field: &str) -> Result<(), AppError> {
    if value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::InvalidPostalCode,
            format!("{field} must be 6 digits"),
        )
        .with_detail("field", field))
    }
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::InvalidEmail).with_detail("email", value))
    }
}

/// Category ids are lowercase slugs: `[a-z0-9-]+`, not starting or ending with `-`.
pub fn validate_slug(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_SHORT_TEXT_LEN)?;
    let valid = value
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{field} must contain only lowercase letters, digits and hyphens"
        )))
    }
}

// ── Domain payloads ─────────────────────────────────────────────────

fn validate_address(address: &AddressInput, role: &str) -> Result<(), AppError> {
    validate_required_text(&address.line1, &format!("{role}.line1"), MAX_ADDRESS_LEN)?;
    validate_optional_text(&address.line2, &format!("{role}.line2"), MAX_ADDRESS_LEN)?;
    validate_required_text(&address.city, &format!("{role}.city"), MAX_NAME_LEN)?;
    validate_optional_text(&address.state, &format!("{role}.state"), MAX_NAME_LEN)?;
    validate_required_text(&address.country, &format!("{role}.country"), MAX_NAME_LEN)?;
    validate_optional_text(&address.label, &format!("{role}.label"), MAX_NAME_LEN)?;
    validate_postal_code(&address.postal_code, &format!("{role}.postalCode"))
}

/// Checkout payload checks performed before `create_order`.
pub fn validate_order_input(input: &OrderCreateInput) -> Result<(), AppError> {
    if input.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    validate_required_text(&input.transaction_id, "transactionId", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.order_number, "orderNumber", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.channel, "channel", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.currency, "currency", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;
    validate_amount(input.total_amount, "totalAmount")?;

    let customer = &input.customer;
    validate_required_text(&customer.first_name, "customer.firstName", MAX_NAME_LEN)?;
    validate_required_text(&customer.last_name, "customer.lastName", MAX_NAME_LEN)?;
    validate_email(&customer.email)?;
    validate_optional_text(&customer.phone, "customer.phone", MAX_SHORT_TEXT_LEN)?;

    validate_address(&input.shipping_address, "shippingAddress")?;
    if let Some(billing) = &input.billing_address {
        validate_address(billing, "billingAddress")?;
    }

    for (index, item) in input.items.iter().enumerate() {
        validate_required_text(&item.product_id, &format!("items[{index}].productId"), MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&item.sku, &format!("items[{index}].sku"), MAX_SHORT_TEXT_LEN)?;
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "items[{index}].quantity must be positive"
            )));
        }
        validate_amount(item.unit_price, &format!("items[{index}].unitPrice"))?;
        if let Some(discount) = item.discount {
            validate_amount(discount, &format!("items[{index}].discount"))?;
        }
        if let Some(tax) = item.tax {
            validate_amount(tax, &format!("items[{index}].tax"))?;
        }
    }

    Ok(())
}

/// Product payload checks performed before `create_product` / `update_product`.
pub fn validate_product_input(input: &ProductInput) -> Result<(), AppError> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&input.sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&input.product_story, "productStory", MAX_NOTE_LEN)?;
    validate_optional_text(&input.material_info, "materialInfo", MAX_NOTE_LEN)?;
    validate_optional_text(&input.currency, "currency", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.image_path, "imagePath", MAX_URL_LEN)?;
    validate_optional_text(&input.image_alt, "imageAlt", MAX_NAME_LEN)?;

    if !input.price.is_finite() || input.price < 0.0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }

    let inventory = &input.inventory;
    let counters = [
        ("inventory.onHand", Some(inventory.on_hand)),
        ("inventory.reserved", inventory.reserved),
        ("inventory.safetyStock", inventory.safety_stock),
        ("inventory.reorderPoint", inventory.reorder_point),
    ];
    for (field, value) in counters {
        if let Some(v) = value
            && v < 0
        {
            return Err(AppError::with_message(
                ErrorCode::InventoryInvalidQuantity,
                format!("{field} must not be negative"),
            ));
        }
    }

    Ok(())
}

/// Category payload checks performed before `create_category`.
pub fn validate_category_input(input: &CategoryInput) -> Result<(), AppError> {
    validate_slug(&input.id, "id")?;
    validate_required_text(&input.label, "label", MAX_NAME_LEN)?;
    validate_required_text(&input.nav_label, "navLabel", MAX_NAME_LEN)?;
    if input.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "description is too long ({} chars, max {MAX_NOTE_LEN})",
            input.description.len()
        )));
    }
    Ok(())
}

/// Admin credentials checks performed before `create_admin_user`.
pub fn validate_admin_credentials(email: &str, password: &str) -> Result<(), AppError> {
    validate_email(email)?;
    if password.len() < 8 {
        return Err(AppError::validation(
            "password must be at least 8 characters",
        ));
    }
    validate_required_text(password, "password", MAX_PASSWORD_LEN)
}
