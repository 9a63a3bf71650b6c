//! SQL text helpers for administrative statements.
//!
//! Statements are sent to the admin client as text, so names and
//! passwords must be quoted here rather than bound as parameters.

/// Quote an identifier (role or database name) for Postgres.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a string literal for Postgres.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn role_exists_query(role: &str) -> String {
    format!(
        "SELECT 1 FROM pg_roles WHERE rolname = {};",
        quote_literal(role)
    )
}

pub fn database_exists_query(database: &str) -> String {
    format!(
        "SELECT 1 FROM pg_database WHERE datname = {};",
        quote_literal(database)
    )
}

pub fn create_role(role: &str, password: &str) -> String {
    format!(
        "CREATE ROLE {} WITH LOGIN PASSWORD {};",
        quote_ident(role),
        quote_literal(password)
    )
}

pub fn create_database(database: &str, owner: &str) -> String {
    format!(
        "CREATE DATABASE {} OWNER {};",
        quote_ident(database),
        quote_ident(owner)
    )
}

pub fn grant_all(database: &str, role: &str) -> String {
    format!(
        "GRANT ALL PRIVILEGES ON DATABASE {} TO {};",
        quote_ident(database),
        quote_ident(role)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("crm"), "\"crm\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("pass"), "'pass'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_create_role_statement() {
        assert_eq!(
            create_role("crm_user", "s'ecret"),
            "CREATE ROLE \"crm_user\" WITH LOGIN PASSWORD 's''ecret';"
        );
    }

    #[test]
    fn test_existence_queries_use_literals() {
        assert_eq!(
            role_exists_query("crm_user"),
            "SELECT 1 FROM pg_roles WHERE rolname = 'crm_user';"
        );
        assert_eq!(
            database_exists_query("crm_msui"),
            "SELECT 1 FROM pg_database WHERE datname = 'crm_msui';"
        );
    }

    #[test]
    fn test_grant_and_create_database_quote_names() {
        assert_eq!(
            create_database("crm_msui", "crm_user"),
            "CREATE DATABASE \"crm_msui\" OWNER \"crm_user\";"
        );
        assert_eq!(
            grant_all("crm_msui", "crm_user"),
            "GRANT ALL PRIVILEGES ON DATABASE \"crm_msui\" TO \"crm_user\";"
        );
    }
}
