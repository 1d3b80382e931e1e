//! State written through to `FileStorage` survives reopening the stores.

use std::fs;

use rusty_money::{
    Money,
    iso::{GBP, INR},
};
use testresult::TestResult;

use cartwright::{
    cart::{CART_STORAGE_KEY, CartStore, NewCartLine},
    products::{Product, ProductUuid},
    shelves::{AddOutcome, CompareList, RecentlyViewed, ShelfEntry, Wishlist},
    storage::FileStorage,
};

fn product(title: &str, major: i64) -> Product<'static> {
    Product {
        uuid: ProductUuid::now_v7(),
        title: title.to_string(),
        price: Money::from_minor(major * 100, INR),
        mrp: Money::from_minor(major * 125, INR),
        stock: 8,
        image: format!("https://cdn.example/{}.jpg", title.to_lowercase()),
    }
}

#[test]
fn cart_survives_reopen() -> TestResult {
    let dir = tempfile::tempdir()?;
    let kurta = product("Kurta", 799);

    let mut cart = CartStore::open(INR, FileStorage::new(dir.path()));
    let line = cart.add_item(NewCartLine::from_product(
        &kurta,
        2,
        Some("Size L".to_string()),
    ))?;
    cart.add_item(NewCartLine::from_product(&product("Stole", 300), 1, None))?;
    cart.update_quantity(line, 3);

    let reopened = CartStore::open(INR, FileStorage::new(dir.path()));

    assert_eq!(reopened.lines(), cart.lines());
    assert_eq!(reopened.item_count(), 4);
    assert_eq!(reopened.subtotal(), Money::from_minor(269_700, INR));

    Ok(())
}

#[test]
fn corrupt_cart_file_opens_empty() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join(format!("{CART_STORAGE_KEY}.json")),
        "{not json",
    )?;

    let mut cart = CartStore::open(INR, FileStorage::new(dir.path()));

    assert!(cart.is_empty());

    cart.add_item(NewCartLine::from_product(&product("Kurta", 799), 1, None))?;

    assert_eq!(CartStore::open(INR, FileStorage::new(dir.path())).len(), 1);

    Ok(())
}

#[test]
fn cart_in_another_currency_is_not_reused() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut cart = CartStore::open(INR, FileStorage::new(dir.path()));
    cart.add_item(NewCartLine::from_product(&product("Kurta", 799), 1, None))?;

    assert!(CartStore::open(GBP, FileStorage::new(dir.path())).is_empty());

    Ok(())
}

#[test]
fn shelves_survive_reopen_independently() -> TestResult {
    let dir = tempfile::tempdir()?;
    let kurta = product("Kurta", 799);
    let stole = product("Stole", 300);

    let mut wishlist = Wishlist::open(INR, FileStorage::new(dir.path()));
    let mut compare = CompareList::open(INR, FileStorage::new(dir.path()));

    assert_eq!(wishlist.add(ShelfEntry::from_product(&kurta))?, AddOutcome::Added);
    assert_eq!(compare.add(ShelfEntry::from_product(&stole))?, AddOutcome::Added);

    let wishlist = Wishlist::open(INR, FileStorage::new(dir.path()));
    let compare = CompareList::open(INR, FileStorage::new(dir.path()));

    assert!(wishlist.is_in_wishlist(kurta.uuid));
    assert!(!wishlist.is_in_wishlist(stole.uuid));
    assert!(compare.is_in_compare(stole.uuid));
    assert!(!compare.is_in_compare(kurta.uuid));

    Ok(())
}

#[test]
fn recently_viewed_reopens_newest_first_within_capacity() -> TestResult {
    let dir = tempfile::tempdir()?;
    let viewed = ["Kurta", "Stole", "Saree"].map(|title| product(title, 500));

    let mut recent = RecentlyViewed::open(INR, FileStorage::new(dir.path()), 10);

    for item in &viewed {
        recent.record(ShelfEntry::from_product(item))?;
    }

    let reopened = RecentlyViewed::open(INR, FileStorage::new(dir.path()), 2);

    let titles = reopened
        .entries()
        .iter()
        .map(|entry| entry.title.as_str())
        .collect::<Vec<_>>();

    assert_eq!(titles, ["Saree", "Stole"]);

    Ok(())
}
