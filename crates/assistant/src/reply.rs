use core::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use farmacontrol_core::ProductId;
use farmacontrol_inventory::Product;

use crate::recommend::recommend;

/// How many products a reply lists at most.
pub const MAX_SUGGESTIONS: usize = 3;

const CLARIFICATION: &str = "No encontré productos para esa consulta. \
Cuénteme qué síntomas tiene (por ejemplo: dolor de cabeza, fiebre, alergia, acidez) \
y le sugiero opciones disponibles en stock.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("invalid query: {0}")]
    InvalidInput(String),
}

/// Assistant answer to one user query.
///
/// Read-only with respect to the catalog: it only names products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub products: Vec<ProductId>,
}

impl Reply {
    pub fn clarification() -> Self {
        Self {
            text: CLARIFICATION.to_string(),
            products: Vec::new(),
        }
    }

    pub fn is_clarification(&self) -> bool {
        self.products.is_empty()
    }
}

/// Compose a reply for `query` against the catalog.
///
/// Blank queries are rejected. Unmatched queries get a clarification prompt.
pub fn answer(query: &str, products: &[Product]) -> Result<Reply, AssistantError> {
    if query.trim().is_empty() {
        return Err(AssistantError::InvalidInput("empty query".to_string()));
    }

    let found = recommend(query, products, MAX_SUGGESTIONS);
    if found.is_empty() {
        return Ok(Reply::clarification());
    }

    let mut text = String::from("Según lo que me cuenta, estas opciones pueden ayudarle:\n");
    let mut ids = Vec::with_capacity(found.len());
    let mut any_prescription = false;
    for m in &found {
        let Some(p) = products.iter().find(|p| p.id_typed() == &m.product_id) else {
            continue;
        };
        // Writing into a String cannot fail.
        let _ = write!(
            text,
            "\n• {} ({}) - {}\n  Dosis: {}",
            p.name(),
            p.generic_name(),
            p.price(),
            p.dosage()
        );
        if p.requires_prescription() {
            any_prescription = true;
            text.push_str("\n  Requiere receta médica.");
        }
        ids.push(m.product_id.clone());
    }

    if any_prescription {
        text.push_str("\n\nLos productos con receta solo se venden presentando la prescripción.");
    }
    text.push_str("\n\nConsulte a un profesional de salud si los síntomas persisten.");

    Ok(Reply { text, products: ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_support::catalog;

    #[test]
    fn blank_query_is_invalid() {
        assert_eq!(
            answer("  \n ", &catalog()),
            Err(AssistantError::InvalidInput("empty query".to_string()))
        );
    }

    #[test]
    fn unmatched_query_gets_clarification() {
        let reply = answer("quiero un perfume", &catalog()).unwrap();
        assert!(reply.is_clarification());
        assert_eq!(reply, Reply::clarification());
    }

    #[test]
    fn matched_reply_lists_products_with_price_and_dosage() {
        let reply = answer("tengo acidez", &catalog()).unwrap();
        assert_eq!(
            reply.products.iter().map(ProductId::as_str).collect::<Vec<_>>(),
            vec!["p4"]
        );
        assert!(reply.text.contains("Omeprazol 20mg"));
        assert!(reply.text.contains("R$ 12,50"));
        assert!(reply.text.contains("Dosis: 1 comprimido cada 8 horas"));
        assert!(!reply.text.contains("receta médica"));
    }

    #[test]
    fn prescription_products_are_flagged() {
        use crate::recommend::test_support::{seed, today};

        let mut rx = seed("p3", "Amoxicilina 500mg", 200, &["infeccion bacteriana"]);
        rx.requires_prescription = true;
        let catalog = vec![Product::from_seed(rx, today())];

        let reply = answer("tengo una infección bacteriana", &catalog).unwrap();
        assert_eq!(reply.products.len(), 1);
        assert!(reply.text.contains("Requiere receta médica."));
    }
}
