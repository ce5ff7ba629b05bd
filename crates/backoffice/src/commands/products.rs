//! Product command handlers.

use tabled::Tabled;

use backoffice_core::{Product, Products};

use crate::CliSession;
use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::list::{self, Surface};

const SURFACE: Surface = Surface {
    noun: "product",
    route: "/products",
    list_command: "products list",
};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    product_type: String,
    #[tabled(rename = "State")]
    state_origin: String,
    #[tabled(rename = "Fabric")]
    fabric: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Region")]
    region: String,
}

impl ProductRow {
    fn new(p: &Product, color: bool) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            product_type: p.product_type.clone(),
            state_origin: p.state_origin.clone(),
            fabric: p.fabric.clone(),
            price: format!("{:.2}", p.base_price),
            discount: if p.discount_percentage > 0.0 {
                format!("{}%", p.discount_percentage)
            } else {
                String::new()
            },
            stock: output::stock_level(p.stock_quantity, p.stock_level(), color),
            region: p.region_name().unwrap_or_default().to_owned(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &CliSession, args: ProductsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List(list_args) => {
            let state = list::fetch::<Products>(session, &SURFACE, &list_args, global).await?;
            let color = output::should_color(global.color);
            list::print::<Products, _>(&state, global, |p| ProductRow::new(p, color))
        }
        ProductsCommand::Delete(delete_args) => {
            list::delete::<Products>(session, &SURFACE, &delete_args, global).await
        }
    }
}
