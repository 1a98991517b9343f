//! WhatsApp checkout handoff.
//!
//! There is no payment flow: checkout validates the contact form, lays
//! the order out as a WhatsApp message and hands back a `wa.me` URL the
//! client opens. The cart itself lives client-side; it arrives here as a
//! list of `(name, quantity, price)` lines.

use std::sync::LazyLock;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s+.\-]{8,20}$").expect("valid phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(checkout))
}

/// One cart line, keyed client-side by (product, color, size).
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub quantity: u32,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Checkout form payload.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    /// Free-text article reference when ordering without a cart.
    #[serde(default)]
    pub article: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

/// Checkout response: the URL to open.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Validate the order form and build the WhatsApp handoff URL.
///
/// POST /api/checkout
async fn checkout(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let nom = body.nom.trim();
    if nom.is_empty() {
        return Err(AppError::BadRequest("Le nom est requis.".to_string()));
    }
    if nom.chars().count() < 2 {
        return Err(AppError::BadRequest("Au moins 2 caractères.".to_string()));
    }

    let email = body.email.trim();
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        return Err(AppError::BadRequest("Email invalide.".to_string()));
    }

    let telephone = body.telephone.trim();
    if !telephone.is_empty() && !PHONE_RE.is_match(telephone) {
        return Err(AppError::BadRequest("Numéro invalide.".to_string()));
    }

    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("Le message est requis.".to_string()));
    }
    if message.chars().count() < 8 {
        return Err(AppError::BadRequest("Minimum 8 caractères.".to_string()));
    }

    let text = order_message(nom, email, telephone, body.article.trim(), message, &body.items);
    let url = format!(
        "https://wa.me/{}?text={}",
        state.config().whatsapp_number,
        urlencoding::encode(&text)
    );

    Ok(Json(CheckoutResponse { url }))
}

/// Lay the order out as the WhatsApp message body.
fn order_message(
    nom: &str,
    email: &str,
    telephone: &str,
    article: &str,
    message: &str,
    items: &[CartLine],
) -> String {
    let mut lines = vec![
        "Bonjour Luxury Market,".to_string(),
        String::new(),
        "Je souhaite passer une commande.".to_string(),
        String::new(),
        format!("Nom : {nom}"),
        format!(
            "Email : {}",
            if email.is_empty() { "Non renseigné" } else { email }
        ),
        format!(
            "Téléphone : {}",
            if telephone.is_empty() {
                "Non renseigné"
            } else {
                telephone
            }
        ),
    ];

    if items.is_empty() {
        lines.push(format!(
            "Article : {}",
            if article.is_empty() { "Non précisé" } else { article }
        ));
    } else {
        lines.push(String::new());
        lines.push("Panier :".to_string());
        let mut subtotal: i64 = 0;
        for item in items {
            let line_total = item.price.saturating_mul(i64::from(item.quantity));
            subtotal = subtotal.saturating_add(line_total);
            let mut label = item.name.clone();
            let variant: Vec<&str> = [item.color.as_deref(), item.size.as_deref()]
                .into_iter()
                .flatten()
                .filter(|v| !v.trim().is_empty())
                .collect();
            if !variant.is_empty() {
                label.push_str(&format!(" ({})", variant.join(", ")));
            }
            lines.push(format!(
                "- {label} x{} : {}",
                item.quantity,
                format_price(line_total)
            ));
        }
        lines.push(format!("Total panier : {}", format_price(subtotal)));
    }

    lines.push(String::new());
    lines.push("Message :".to_string());
    lines.push(message.to_string());

    lines.join("\n")
}

/// French-style price formatting: narrow no-break-space thousands
/// separator and the franc suffix (12500 -> "12 500 F").
fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(c);
    }
    if amount < 0 {
        grouped.insert(0, '-');
    }
    format!("{grouped} F")
}
