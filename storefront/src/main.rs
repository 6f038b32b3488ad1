// storefront/src/main.rs

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use storefront_client::money::format_vnd;
use storefront_client::{
  AppConfig, AppError, HttpStorefrontApi, Notice, ProductId, Result as AppResult, SelectionWorkflow, Session,
  StorefrontApi,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storefront", about = "Cart, selection and checkout against a storefront API")]
struct Cli {
  /// Base URL including any API prefix, e.g. http://localhost:8080/api
  #[arg(long, env = "STOREFRONT_API_URL")]
  api_url: Option<String>,

  /// Bearer token from `storefront login`
  #[arg(long, env = "STOREFRONT_TOKEN", hide_env_values = true)]
  token: Option<String>,

  /// Emit logs as JSON lines on stderr
  #[arg(long)]
  log_json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Log in and print the bearer token
  Login {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
  },
  /// List the product catalog
  Products,
  /// List bookable services
  Services,
  /// List product categories
  Categories,
  /// Show the cart, the selection and the selected total
  Cart,
  /// Add a product to the cart
  Add {
    product_id: String,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
  },
  /// Set a cart line's quantity
  Quantity {
    product_id: String,
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
  },
  /// Remove a cart line
  Remove { product_id: String },
  /// Select or deselect one cart line for checkout
  Toggle { product_id: String },
  /// Select every line, or deselect all when everything is selected
  ToggleAll,
  /// Order the selected items
  Checkout,
  /// List placed orders
  Orders,
}

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.log_json);

  match run(cli).await {
    Ok(notice) => {
      println!("{}", notice);
      ExitCode::SUCCESS
    }
    Err(e) => {
      tracing::debug!(error = ?e, "Command failed.");
      eprintln!("{}", Notice::from(&e));
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> AppResult<Notice> {
  let mut config = AppConfig::from_env()?;
  if let Some(url) = cli.api_url {
    config.api_url = storefront_client::config::normalize_base_url(&url)?;
  }
  if cli.token.is_some() {
    config.token = cli.token;
  }

  let api = Arc::new(HttpStorefrontApi::from_config(&config)?);
  let session = match &config.token {
    Some(token) => Session::with_token(token.clone()),
    None => Session::anonymous(),
  };

  match cli.command {
    Command::Login { email, password } => {
      let resp = api.login(&email, &password).await?;
      let session = Session::from_login(&resp);
      println!("{}", resp.token);
      let name = session.profile().map(|p| p.display_name()).unwrap_or_default();
      Ok(Notice::success(format!("Logged in as {} ({}).", name, resp.role)))
    }
    Command::Products => {
      let products = api.products().await?;
      for p in &products {
        println!("{}  {:<32} {:>12} đ", p.id, p.name, format_vnd(p.price));
      }
      Ok(Notice::success(format!("{} product(s).", products.len())))
    }
    Command::Services => {
      let services = api.services().await?;
      for s in &services {
        println!("{}  {:<32} {:>12} đ", s.id, s.name, format_vnd(s.price));
      }
      Ok(Notice::success(format!("{} service(s).", services.len())))
    }
    Command::Categories => {
      let categories = api.product_categories().await?;
      for c in &categories {
        println!("{}  {}", c.id, c.name);
      }
      Ok(Notice::success(format!("{} categories.", categories.len())))
    }
    command => {
      let workflow = SelectionWorkflow::new(api, session, config.workflow.clone())?;
      workflow.reload().await?;
      run_cart_command(&workflow, command).await
    }
  }
}

async fn run_cart_command(workflow: &SelectionWorkflow, command: Command) -> AppResult<Notice> {
  match command {
    Command::Cart => {
      print_cart(workflow);
      Ok(Notice::success(format!("{} item(s) in cart.", workflow.badge_count())))
    }
    Command::Add { product_id, quantity } => {
      workflow.add_to_cart(&ProductId::from(product_id), quantity).await?;
      Ok(Notice::success(format!("Added. {} item(s) in cart.", workflow.badge_count())))
    }
    Command::Quantity { product_id, quantity } => {
      let change = workflow.set_quantity(&ProductId::from(product_id), quantity).await?;
      Ok(change.notice())
    }
    Command::Remove { product_id } => {
      workflow.remove_item(&ProductId::from(product_id)).await?;
      Ok(Notice::success(format!("Removed. {} item(s) in cart.", workflow.badge_count())))
    }
    Command::Toggle { product_id } => {
      let selected = workflow.toggle_select(&ProductId::from(product_id)).await?;
      let state = if selected { "Selected" } else { "Deselected" };
      Ok(Notice::success(format!("{}. Total: {} đ", state, workflow.total_price_display())))
    }
    Command::ToggleAll => Ok(workflow.toggle_all().await?.notice()),
    Command::Checkout => Ok(workflow.checkout().await?.notice()),
    Command::Orders => {
      let orders = workflow.orders().await?;
      for o in &orders {
        let created = o.created_at.map(|t| t.to_rfc3339()).unwrap_or_default();
        println!(
          "{}  {:>12} đ  {}",
          created,
          format_vnd(o.items_total()),
          o.status.as_deref().unwrap_or("-")
        );
      }
      Ok(Notice::success(format!("{} order(s).", orders.len())))
    }
    Command::Login { .. } | Command::Products | Command::Services | Command::Categories => {
      Err(AppError::Internal("not a cart command".to_string()))
    }
  }
}

fn print_cart(workflow: &SelectionWorkflow) {
  let snapshot = workflow.snapshot();
  for item in &snapshot.items {
    let mark = if snapshot.is_selected(&item.product_id) { "[x]" } else { "[ ]" };
    println!(
      "{} {}  {:<32} x{:<3} {:>12} đ",
      mark,
      item.product_id,
      item.name,
      item.quantity,
      format_vnd(item.line_total())
    );
  }
  println!("Selected total: {} đ", format_vnd(snapshot.total_price()));
}
