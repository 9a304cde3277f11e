//! Order message building and the messaging handoff.
//!
//! The order summary is built as a typed structure and only serialized to
//! text (and into the handoff URL) at the boundary, so encoding is applied
//! in exactly one place.

use url::Url;

use crate::cart::Cart;
use crate::config::{CoverageArea, StoreConfig};
use crate::types::Money;

/// Base URL of the outbound messaging channel.
pub const MESSAGING_BASE: &str = "https://api.whatsapp.com/send";

/// How the customer intends to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentChoice {
    /// Instant transfer; the store's PIX key is echoed verbatim.
    Pix,
    /// Cash on handover, optionally asking for change.
    Cash { change_for: Option<Money> },
    /// Anything else - settled directly with the store.
    Other,
}

/// The delivery selection made at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliverySelection {
    pub address: String,
    pub area: CoverageArea,
}

/// One itemized line of the order summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub quantity: u32,
    pub name: String,
    pub unit_price: Money,
}

/// A fully resolved order summary, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderMessage {
    customer_name: String,
    lines: Vec<OrderLine>,
    subtotal: Money,
    delivery: Option<DeliverySelection>,
    payment: PaymentChoice,
    pix_key: String,
}

impl OrderMessage {
    /// Resolve the cart and checkout inputs into an order summary.
    #[must_use]
    pub fn build(
        cart: &Cart,
        config: &StoreConfig,
        customer_name: &str,
        delivery: Option<DeliverySelection>,
        payment: PaymentChoice,
    ) -> Self {
        let lines = cart
            .entries()
            .iter()
            .map(|entry| OrderLine {
                quantity: entry.quantity,
                name: entry.product.name.clone(),
                unit_price: entry.product.price,
            })
            .collect();

        Self {
            customer_name: customer_name.trim().to_string(),
            lines,
            subtotal: cart.total(),
            delivery,
            payment,
            pix_key: config.payment.pix_key.clone(),
        }
    }

    /// Grand total: subtotal plus the delivery fee, when delivering.
    #[must_use]
    pub fn total(&self) -> Money {
        match &self.delivery {
            Some(selection) => self.subtotal + selection.area.fee,
            None => self.subtotal,
        }
    }

    /// Serialize the summary into the message text.
    ///
    /// The template is deterministic: itemized lines, subtotal, an
    /// optional delivery fee line, the grand total, then the payment
    /// trailer. Currency always renders as `R$ 0,00`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("Olá! Gostaria de fazer o seguinte pedido:\n\n*ITENS:*\n");

        for line in &self.lines {
            out.push_str(&format!(
                "* {}x {} ({})\n",
                line.quantity, line.name, line.unit_price
            ));
        }

        out.push_str(&format!("\n*Subtotal:* {}\n", self.subtotal));
        if let Some(selection) = &self.delivery {
            out.push_str(&format!(
                "*Entrega ({}):* {}\n",
                selection.area.name, selection.area.fee
            ));
        }
        out.push_str(&format!("*TOTAL:* {}\n", self.total()));

        out.push_str("\n*PAGAMENTO:*\n");
        match &self.payment {
            PaymentChoice::Pix => out.push_str(&format!("PIX: {}\n", self.pix_key)),
            PaymentChoice::Cash {
                change_for: Some(amount),
            } => out.push_str(&format!("Dinheiro - Troco para: {amount}\n")),
            PaymentChoice::Cash { change_for: None } => {
                out.push_str("Dinheiro - Sem troco (valor exato)\n");
            }
            PaymentChoice::Other => out.push_str("Forma de pagamento a combinar\n"),
        }

        out.push_str(&format!("\n*Cliente:* {}\n", self.customer_name));
        if let Some(selection) = &self.delivery {
            out.push_str(&format!("*Endereço:* {}\n", selection.address));
        }

        out
    }
}

/// Build the messaging handoff URL for an order message.
///
/// The message is percent-encoded into the `text` query parameter of the
/// messaging base, addressed at the store's configured contact number.
/// No response from the channel is ever awaited.
///
/// # Errors
///
/// Returns an error if the assembled URL is invalid.
pub fn handoff_url(contact_number: &str, message: &str) -> Result<Url, url::ParseError> {
    let phone = urlencoding::encode(contact_number);
    let text = urlencoding::encode(message);
    Url::parse(&format!("{MESSAGING_BASE}?phone={phone}&text={text}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::types::StoreStatus;

    fn cart_with_template_products(config: &StoreConfig) -> Cart {
        let mut cart = Cart::new();
        let a = &config.products[0];
        let b = &config.products[1];
        cart.add_item(a, a.stock, StoreStatus::Open).unwrap();
        cart.add_item(a, a.stock, StoreStatus::Open).unwrap();
        cart.add_item(b, b.stock, StoreStatus::Open).unwrap();
        cart
    }

    #[test]
    fn test_message_is_deterministic_and_itemized() {
        let mut config = StoreConfig::template();
        config.payment.pix_key = "loja@exemplo.com".to_string();
        let cart = cart_with_template_products(&config);

        let message = OrderMessage::build(&cart, &config, "Ana", None, PaymentChoice::Pix);

        assert_eq!(
            message.render(),
            "Olá! Gostaria de fazer o seguinte pedido:\n\n\
             *ITENS:*\n\
             * 2x X-Salada Clássico (R$ 18,50)\n\
             * 1x Batata Média (R$ 8,00)\n\n\
             *Subtotal:* R$ 45,00\n\
             *TOTAL:* R$ 45,00\n\n\
             *PAGAMENTO:*\n\
             PIX: loja@exemplo.com\n\n\
             *Cliente:* Ana\n"
        );
    }

    #[test]
    fn test_delivery_adds_fee_line_and_address() {
        let config = StoreConfig::template();
        let cart = cart_with_template_products(&config);
        let delivery = DeliverySelection {
            address: "Rua das Flores, 10".to_string(),
            area: config.coverage_areas[0].clone(),
        };

        let message = OrderMessage::build(
            &cart,
            &config,
            "Ana",
            Some(delivery),
            PaymentChoice::Cash { change_for: None },
        );
        let text = message.render();

        assert_eq!(message.total(), Money::from_cents(5000));
        assert!(text.contains("*Entrega (Centro):* R$ 5,00\n"));
        assert!(text.contains("*TOTAL:* R$ 50,00\n"));
        assert!(text.contains("Dinheiro - Sem troco (valor exato)\n"));
        assert!(text.contains("*Endereço:* Rua das Flores, 10\n"));
    }

    #[test]
    fn test_cash_change_amount_is_echoed_verbatim() {
        let config = StoreConfig::template();
        let cart = cart_with_template_products(&config);

        let message = OrderMessage::build(
            &cart,
            &config,
            "Ana",
            None,
            PaymentChoice::Cash {
                change_for: Some(Money::from_cents(10000)),
            },
        );

        assert!(message.render().contains("Dinheiro - Troco para: R$ 100,00\n"));
    }

    #[test]
    fn test_other_payment_gets_generic_trailer() {
        let config = StoreConfig::template();
        let cart = cart_with_template_products(&config);

        let message = OrderMessage::build(&cart, &config, "Ana", None, PaymentChoice::Other);

        assert!(message.render().contains("Forma de pagamento a combinar\n"));
    }

    #[test]
    fn test_handoff_url_is_percent_encoded() {
        let url = handoff_url("5511999998888", "Olá! Pedido: R$ 18,50").unwrap();

        assert_eq!(url.host_str(), Some("api.whatsapp.com"));
        assert_eq!(url.path(), "/send");
        let query = url.query().unwrap();
        assert!(query.contains("phone=5511999998888"));
        // Spaces are %20, not '+'; the accent survives as UTF-8 bytes
        assert!(query.contains("text=Ol%C3%A1%21%20Pedido%3A%20R%24%2018%2C50"));
    }
}
