//! `tapdesk` — taproom ordering front-end for the MoySklad ERP.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use tapdesk_app::{
    AuthController, ChosenLine, OrderController, StockController, StockModel, telemetry,
};
use tapdesk_events::{InMemoryEventBus, spawn_logger};
use tapdesk_history::OrderHistory;
use tapdesk_moysklad::{ErpConfig, Gateway, StockItem};

#[derive(Parser)]
#[command(name = "tapdesk", about = "Taproom ordering front-end for the MoySklad ERP")]
struct Cli {
    /// Ordering account email (must be in the account directory).
    #[arg(long)]
    email: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show sellable stock for the account's price tier.
    Stock,
    /// Submit a customer order.
    Order {
        /// Order line as `<product-id>:<quantity>`; repeatable.
        #[arg(long = "line", value_parser = parse_line, required = true)]
        lines: Vec<(String, u32)>,
        /// Free-text comment attached to the order.
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show the local order history.
    History {
        /// Clear this account's history instead of listing it.
        #[arg(long)]
        clear: bool,
    },
}

fn parse_line(raw: &str) -> Result<(String, u32), String> {
    let (id, quantity) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected <product-id>:<quantity>, got '{raw}'"))?;
    if id.is_empty() {
        return Err(format!("missing product id in '{raw}'"));
    }
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| format!("'{quantity}' is not a valid quantity"))?;
    if quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }
    Ok((id.to_string(), quantity))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let cli = Cli::parse();

    let bus = Arc::new(InMemoryEventBus::new());
    let logger = spawn_logger(&*bus);

    let auth = AuthController::new(bus.clone());
    let user = auth.login(&cli.email)?;

    match cli.command {
        Command::Stock => {
            let gateway = Arc::new(Gateway::new(ErpConfig::from_env()?)?);
            let stock = StockController::new(gateway, Arc::new(StockModel::new()), bus.clone());
            let items = stock.load(user.tier).await?;

            if items.is_empty() {
                println!("No sellable stock right now.");
            } else {
                print_stock(&items);
            }
        }
        Command::Order { lines, comment } => {
            let gateway = Arc::new(Gateway::new(ErpConfig::from_env()?)?);
            let stock = StockController::new(
                gateway.clone(),
                Arc::new(StockModel::new()),
                bus.clone(),
            );
            let items = stock.load(user.tier).await?;
            let chosen = pick_lines(&items, &lines)?;

            let history = Arc::new(OrderHistory::open_default()?);
            let orders = OrderController::new(gateway, history, bus.clone());
            let saved = orders
                .submit(&user.email, comment.as_deref(), &chosen)
                .await?;

            println!(
                "Order submitted: {} line(s), saved locally as {}.",
                saved.lines.len(),
                saved.id
            );
        }
        Command::History { clear } => {
            let history = OrderHistory::open_default()?;
            if clear {
                history.clear(Some(&user.email)).await?;
                println!("Order history cleared for {}.", user.email);
            } else {
                let orders = history.list(&user.email).await?;
                if orders.is_empty() {
                    println!("No orders on record for {}.", user.email);
                }
                for order in orders {
                    let when = order.created_at.format("%Y-%m-%d %H:%M");
                    println!("{when}  {}", order.comment.as_deref().unwrap_or("-"));
                    for line in &order.lines {
                        println!("    {} x{}", line.name, line.quantity);
                    }
                }
            }
        }
    }

    auth.logout();

    // Release every bus handle so the logger drains and exits.
    drop(auth);
    drop(bus);
    let _ = logger.join();
    Ok(())
}

/// Match the requested lines against the reconciled stock list.
fn pick_lines(items: &[StockItem], lines: &[(String, u32)]) -> anyhow::Result<Vec<ChosenLine>> {
    lines
        .iter()
        .map(|(id, quantity)| {
            let item = items
                .iter()
                .find(|item| &item.id == id)
                .with_context(|| format!("product {id} is not available at your price tier"))?;
            if f64::from(*quantity) > item.available {
                bail!(
                    "only {} of '{}' available, requested {}",
                    item.available,
                    item.name,
                    quantity
                );
            }
            Ok(ChosenLine {
                item: item.clone(),
                quantity: *quantity,
            })
        })
        .collect()
}

fn print_stock(items: &[StockItem]) {
    println!("{:<38} {:<30} {:<10} {:>9} {:>10}", "ID", "NAME", "ARTICLE", "AVAILABLE", "PRICE");
    for item in items {
        println!(
            "{:<38} {:<30} {:<10} {:>9} {:>10.2}",
            item.id, item.name, item.article, item.available, item.price
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_accepts_id_and_quantity() {
        assert_eq!(parse_line("p1:3").unwrap(), ("p1".to_string(), 3));
    }

    #[test]
    fn parse_line_rejects_malformed_input() {
        assert!(parse_line("p1").is_err());
        assert!(parse_line(":3").is_err());
        assert!(parse_line("p1:zero").is_err());
        assert!(parse_line("p1:0").is_err());
    }

    #[test]
    fn pick_lines_enforces_availability() {
        let items = vec![StockItem {
            id: "p1".into(),
            name: "Jaws Lager".into(),
            article: String::new(),
            available: 2.0,
            price: 10.0,
        }];

        assert!(pick_lines(&items, &[("p1".into(), 2)]).is_ok());
        assert!(pick_lines(&items, &[("p1".into(), 3)]).is_err());
        assert!(pick_lines(&items, &[("p2".into(), 1)]).is_err());
    }
}
