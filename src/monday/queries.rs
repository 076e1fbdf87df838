//! GraphQL query text for the three request shapes

/// Item fields requested on every page
const ITEM_FIELDS: &str = "cursor items { id name column_values { id type text column { title } } }";

/// One page of the boards visible to the token; pages start at 1
pub fn boards_query(limit: u32, page: u32) -> String {
    format!(
        "{{ boards(limit: {limit}, page: {page}) {{ id name }} }}",
        limit = limit,
        page = page,
    )
}

/// Columns plus the first page of items for one board
///
/// Board IDs are numeric; anything else is quoted so the API rejects it
/// instead of the query failing to parse.
pub fn first_page_query(board_id: &str, limit: u32) -> String {
    let id = if !board_id.is_empty() && board_id.chars().all(|c| c.is_ascii_digit()) {
        board_id.to_string()
    } else {
        graphql_string(board_id)
    };
    format!(
        "{{ boards(ids: {id}) {{ name columns {{ title id type }} items_page(limit: {limit}) {{ {fields} }} }} }}",
        id = id,
        limit = limit,
        fields = ITEM_FIELDS,
    )
}

/// The page following `cursor`
pub fn next_page_query(cursor: &str, limit: u32) -> String {
    format!(
        "{{ next_items_page(cursor: {cursor}, limit: {limit}) {{ {fields} }} }}",
        cursor = graphql_string(cursor),
        limit = limit,
        fields = ITEM_FIELDS,
    )
}

/// Quote a value as a GraphQL string literal
///
/// GraphQL string escapes are a subset of JSON's, so JSON encoding is safe.
fn graphql_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
