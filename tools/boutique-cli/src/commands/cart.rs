//! Cart commands.

use anyhow::{bail, Context as _, Result};
use boutique_commerce::cart::{
    AttributeOption, CartCandidate, ItemKey, LineItem, SelectedAttributes,
};
use boutique_commerce::{Currency, Money, ProductId};
use chrono::{DateTime, Local};
use dialoguer::Confirm;
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Column widths for `cart show`: #, item, variant, qty, unit, total.
const SHOW_WIDTHS: [usize; 6] = [3, 24, 16, 5, 10, 10];

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CartCommand::Add {
            product,
            name,
            price,
            qty,
            image,
            attrs,
        } => add(ctx, product, name, &price, qty, image, &attrs),
        CartCommand::Remove { key } => remove(ctx, &key),
        CartCommand::Update { key, qty } => update(ctx, &key, qty),
        CartCommand::Clear { yes } => clear(ctx, yes),
        CartCommand::Show => show(ctx),
        CartCommand::Key { product, attrs } => key(ctx, &product, &attrs),
        CartCommand::Checkout { email } => checkout(ctx, &email),
    }
}

fn add(
    ctx: &Context,
    product: String,
    name: String,
    price: &str,
    qty: i64,
    image: Option<String>,
    attrs: &[String],
) -> Result<()> {
    let mut store = ctx.open_cart()?;
    let unit_price = parse_price(price, store.cart().currency)?;

    let mut candidate = CartCandidate::new(product, name, unit_price)
        .with_quantity(qty)
        .with_attributes(parse_attributes(attrs)?);
    candidate.image_url = image;

    let key = store.add_item(candidate).context("Could not add item")?;
    let line = store
        .cart()
        .get_item(&key)
        .context("Added line is missing from the cart")?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "key": key,
            "line": line,
            "item_count": store.item_count(),
        }));
        return Ok(());
    }

    ctx.output.success(&format!("Added to cart: {}", describe(line)));
    ctx.output.kv("key", key.as_str());
    ctx.output.kv("quantity", &line.quantity.to_string());
    ctx.output.kv("cart", &format!("{} item(s)", store.item_count()));
    Ok(())
}

fn remove(ctx: &Context, key: &str) -> Result<()> {
    let mut store = ctx.open_cart()?;
    let removed = store.remove_item(&ItemKey::from(key));

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "removed": removed }));
        return Ok(());
    }

    match removed {
        Some(line) => ctx.output.success(&format!("Removed {}", describe(&line))),
        None => ctx.output.warn(&format!("No line with key {} in the cart", key)),
    }
    Ok(())
}

fn update(ctx: &Context, key: &str, qty: i64) -> Result<()> {
    let mut store = ctx.open_cart()?;
    let key = ItemKey::from(key);
    let updated = store
        .update_quantity(&key, qty)
        .context("Could not update quantity")?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "key": key,
            "updated": updated,
            "quantity": store.cart().get_item(&key).map(|line| line.quantity),
        }));
        return Ok(());
    }

    if updated {
        ctx.output.success(&format!("Set quantity of {} to {}", key, qty));
    } else {
        ctx.output.warn(&format!("No line with key {} in the cart", key));
    }
    Ok(())
}

fn clear(ctx: &Context, yes: bool) -> Result<()> {
    let mut store = ctx.open_cart()?;

    if needs_prompt(ctx.output.is_json(), yes, store.cart().is_empty())? {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all {} item(s) from the cart?",
                store.item_count()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    store.clear();

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "cleared": true }));
    } else {
        ctx.output.success("Cart cleared");
    }
    Ok(())
}

/// Whether `cart clear` should ask before emptying the cart.
///
/// Never prompts in JSON mode; a non-empty cart needs `--yes` there.
fn needs_prompt(json: bool, yes: bool, empty: bool) -> Result<bool> {
    if yes || empty {
        return Ok(false);
    }
    if json {
        bail!("Refusing to clear the cart without confirmation; pass --yes with --json");
    }
    Ok(true)
}

fn show(ctx: &Context) -> Result<()> {
    let store = ctx.open_cart()?;
    let pricing = store.calculate_pricing().context("Could not price the cart")?;

    if ctx.output.is_json() {
        ctx.output.json(&pricing);
        return Ok(());
    }

    if pricing.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    ctx.output.header(&format!(
        "Cart ({} item(s), {} line(s))",
        pricing.item_count,
        pricing.line_count()
    ));
    ctx.output.table_row(
        &["#", "Item", "Variant", "Qty", "Unit", "Total"],
        &SHOW_WIDTHS,
    );

    for (index, (line, priced)) in store
        .cart()
        .items()
        .iter()
        .zip(&pricing.line_items)
        .enumerate()
    {
        let number = (index + 1).to_string();
        let variant = line.variant_title().unwrap_or_else(|| "-".to_string());
        let quantity = priced.quantity.to_string();
        let unit = priced.unit_price.display();
        let total = priced.total.display();
        ctx.output.table_row(
            &[
                number.as_str(),
                line.name.as_str(),
                variant.as_str(),
                quantity.as_str(),
                unit.as_str(),
                total.as_str(),
            ],
            &SHOW_WIDTHS,
        );
        ctx.output.kv("key", priced.key.as_str());
    }

    ctx.output.info("");
    ctx.output.kv("Subtotal", &pricing.subtotal.display());
    Ok(())
}

fn key(ctx: &Context, product: &str, attrs: &[String]) -> Result<()> {
    let key = ItemKey::new(&ProductId::new(product), &parse_attributes(attrs)?);

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "key": key }));
    } else {
        println!("{}", key);
    }
    Ok(())
}

fn checkout(ctx: &Context, email: &str) -> Result<()> {
    let mut store = ctx.open_cart()?;
    let order = store.checkout(email).context("Checkout failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.success(&format!("Order {} placed", order.order_number));
    ctx.output.kv("id", order.id.as_str());
    ctx.output.kv("email", &order.email);
    ctx.output.kv("placed", &format_timestamp(order.created_at));
    for line in &order.line_items {
        let title = match &line.variant_title {
            Some(variant) => format!("{} ({})", line.name, variant),
            None => line.name.clone(),
        };
        ctx.output.list_item(&format!(
            "{} x {}  {}",
            line.quantity,
            title,
            line.total_price.display()
        ));
    }
    ctx.output.kv("subtotal", &order.subtotal.display());
    Ok(())
}

/// Name plus variant, shortened for one-line messages.
fn describe(line: &LineItem) -> String {
    let name = truncate(&line.name, 40);
    match line.variant_title() {
        Some(variant) => format!("{} ({})", name, variant),
        None => name,
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %:z")
                .to_string()
        })
        .unwrap_or_else(|| secs.to_string())
}

/// Parse `--attr` values.
///
/// `size=M` selects the option with value `M`; a bare `size` records the
/// attribute as offered but unselected. Later values win.
pub fn parse_attributes(attrs: &[String]) -> Result<SelectedAttributes> {
    let mut selected = SelectedAttributes::new();
    for attr in attrs {
        let (name, value) = match attr.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (attr.trim(), None),
        };
        if name.is_empty() {
            bail!("Attribute name missing in {:?} (expected name=value)", attr);
        }
        let option = value
            .filter(|v| !v.is_empty())
            .map(AttributeOption::with_value);
        selected.insert(name, option);
    }
    Ok(selected)
}

/// Parse a price in major units (`19.99`) into the currency's minor units.
pub fn parse_price(input: &str, currency: Currency) -> Result<Money> {
    let input = input.trim();
    let places = currency.decimal_places() as usize;

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        bail!("Invalid price: {:?}", input);
    }
    if fraction.len() > places {
        bail!(
            "Price {} has more than {} decimal place(s) for {}",
            input,
            places,
            currency
        );
    }

    let scale = 10_i64.pow(places as u32);
    let whole: i64 = whole
        .parse()
        .with_context(|| format!("Price out of range: {}", input))?;
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<places$}", fraction).parse()?
    };

    let cents = whole
        .checked_mul(scale)
        .and_then(|amount| amount.checked_add(fraction))
        .with_context(|| format!("Price out of range: {}", input))?;
    Ok(Money::new(cents, currency))
}
