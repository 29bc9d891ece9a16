// Copyright 2023 Remi Bernotavicius

//! Things to buy that no meal plan asked for.

use crate::database;
use crate::database::models::{ShoppingItemId, ShoppingListItem};
use crate::error::{validate_name, Error, Result};
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

fn not_found(item_id: ShoppingItemId) -> Error {
    Error::NotFound {
        entity: "shopping list item",
        id: item_id.0,
    }
}

pub fn add_item(conn: &mut database::Connection, new_name: &str) -> Result<ShoppingItemId> {
    use database::schema::shopping_list_items::dsl::*;
    use diesel::insert_into;

    validate_name("item", new_name)?;
    insert_into(shopping_list_items)
        .values((
            name.eq(new_name.trim()),
            checked.eq(false),
            added_at.eq(chrono::Local::now().naive_local()),
        ))
        .execute(conn)?;
    Ok(ShoppingItemId(database::last_insert_id(conn)?))
}

pub fn list_items(conn: &mut database::Connection) -> Result<Vec<ShoppingListItem>> {
    use database::schema::shopping_list_items::dsl::*;

    Ok(shopping_list_items
        .select(ShoppingListItem::as_select())
        .order(id.asc())
        .load(conn)?)
}

pub fn set_checked(
    conn: &mut database::Connection,
    item_id: ShoppingItemId,
    is_checked: bool,
) -> Result<()> {
    use database::schema::shopping_list_items::dsl::*;
    use diesel::update;

    let rows = update(shopping_list_items)
        .filter(id.eq(item_id))
        .set(checked.eq(is_checked))
        .execute(conn)?;
    if rows == 0 {
        return Err(not_found(item_id));
    }
    Ok(())
}

pub fn remove_item(conn: &mut database::Connection, item_id: ShoppingItemId) -> Result<()> {
    use database::schema::shopping_list_items::dsl::*;
    use diesel::delete;

    let rows = delete(shopping_list_items.filter(id.eq(item_id))).execute(conn)?;
    if rows == 0 {
        return Err(not_found(item_id));
    }
    Ok(())
}

/// Drop everything already bought. Returns how many items went.
pub fn clear_checked(conn: &mut database::Connection) -> Result<usize> {
    use database::schema::shopping_list_items::dsl::*;
    use diesel::delete;

    let removed = delete(shopping_list_items.filter(checked.eq(true))).execute(conn)?;
    log::info!("cleared {removed} checked shopping list items");
    Ok(removed)
}

#[test]
fn checklist() {
    let mut conn = database::establish_in_memory();

    let towels = add_item(&mut conn, " Paper towels ").unwrap();
    let soap = add_item(&mut conn, "Dish soap").unwrap();
    add_item(&mut conn, "Coffee").unwrap();
    assert!(matches!(add_item(&mut conn, "   "), Err(Error::Validation(_))));

    set_checked(&mut conn, towels, true).unwrap();
    set_checked(&mut conn, soap, true).unwrap();
    set_checked(&mut conn, soap, false).unwrap();

    let items = list_items(&mut conn).unwrap();
    assert_eq!(
        items
            .iter()
            .map(|i| (i.name.as_str(), i.checked))
            .collect::<Vec<_>>(),
        vec![("Paper towels", true), ("Dish soap", false), ("Coffee", false)]
    );

    assert_eq!(clear_checked(&mut conn).unwrap(), 1);
    remove_item(&mut conn, soap).unwrap();
    assert!(matches!(remove_item(&mut conn, soap), Err(Error::NotFound { .. })));
    assert!(matches!(
        set_checked(&mut conn, towels, false),
        Err(Error::NotFound { .. })
    ));

    let names: Vec<_> = list_items(&mut conn)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Coffee"]);
}
