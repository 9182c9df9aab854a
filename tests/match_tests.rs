// tests/match_tests.rs

use serde_json::json;
use siftql::{FieldDef, FieldValue, JsonRouter, Record, StdMatcher, parse};

#[derive(Default)]
struct Address {
    city: String,
    zip: u32,
}

impl Record for Address {
    fn field_defs(&self) -> &[FieldDef] {
        const { &[FieldDef::new("city"), FieldDef::tagged("zip", "zip_code")] }
    }

    fn field_value(&self, name: &str) -> FieldValue<'_> {
        match name {
            "city" => FieldValue::from(&self.city),
            "zip" => FieldValue::from(self.zip),
            _ => FieldValue::Null,
        }
    }
}

#[derive(Default)]
struct User {
    name: String,
    age: i32,
    score: f64,
    verified: bool,
    password: String,
    address: Address,
    manager: Option<Box<User>>,
}

impl Record for User {
    fn field_defs(&self) -> &[FieldDef] {
        const {
            &[
                FieldDef::new("name"),
                FieldDef::new("age"),
                FieldDef::new("score"),
                FieldDef::tagged("verified", "is_verified"),
                FieldDef::omitted("password"),
                FieldDef::new("address"),
                FieldDef::new("manager"),
            ]
        }
    }

    fn field_value(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::from(&self.name),
            "age" => FieldValue::from(self.age),
            "score" => FieldValue::from(self.score),
            "verified" => FieldValue::from(self.verified),
            "password" => FieldValue::from(&self.password),
            "address" => FieldValue::Record(&self.address),
            "manager" => FieldValue::optional(self.manager.as_deref()),
            _ => FieldValue::Null,
        }
    }
}

fn ann() -> User {
    User {
        name: "Ann Smith".to_string(),
        age: 34,
        score: 7.5,
        verified: true,
        password: "hunter2".to_string(),
        address: Address {
            city: "Berlin".to_string(),
            zip: 10115,
        },
        manager: None,
    }
}

fn matches(query: &str, user: &User) -> bool {
    parse(query).unwrap().matches(user, &StdMatcher::default())
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_equality_on_record() {
    struct Server {
        status: i64,
    }

    impl Record for Server {
        fn field_defs(&self) -> &[FieldDef] {
            const { &[FieldDef::new("status")] }
        }

        fn field_value(&self, name: &str) -> FieldValue<'_> {
            match name {
                "status" => FieldValue::from(self.status),
                _ => FieldValue::Null,
            }
        }
    }

    let expr = parse("status:200").unwrap();
    let matcher = StdMatcher::default();
    assert!(expr.matches(&Server { status: 200 }, &matcher));
    assert!(!expr.matches(&Server { status: 404 }, &matcher));
}

#[test]
fn test_comparisons() {
    let user = ann();
    let test_cases = vec![
        ("age > 30", true),
        ("age >= 34", true),
        ("age < 34", false),
        ("age <= 34", true),
        ("age != 34", false),
        ("score > 7", true),
        ("score = 7.5", true),
        ("score < 7.4", false),
    ];

    for (query, expected) in test_cases {
        assert_eq!(
            matches(query, &user),
            expected,
            "Failed for query: {}",
            query
        );
    }
}

#[test]
fn test_strings() {
    let user = ann();
    let test_cases = vec![
        (r#"name:"Ann Smith""#, true),
        (r#"name!="Ann Smith""#, false),
        (r#"name~"Smi""#, true),
        (r#"name~"smi""#, false),
        ("name > a", false),
        ("name:34", false),
    ];

    for (query, expected) in test_cases {
        assert_eq!(
            matches(query, &user),
            expected,
            "Failed for query: {}",
            query
        );
    }
}

#[test]
fn test_booleans() {
    let user = ann();
    assert!(matches("is_verified", &user));
    assert!(matches("is_verified:true", &user));
    assert!(!matches("is_verified!=true", &user));
    assert!(!matches("not is_verified", &user));
}

#[test]
fn test_one_of() {
    let user = ann();
    assert!(matches("age:[1, 34, 99]", &user));
    assert!(!matches("age:[1, 2]", &user));
    assert!(matches(r#"name~["Bob", "Smith"]"#, &user));
    assert!(!matches("age:[]", &user));
    assert!(!matches("age>[1]", &user));
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_tag_renames_field() {
    let user = ann();
    assert!(matches("address.zip_code:10115", &user));
    // The raw name is not addressable once a tag is set: treated as absent.
    assert!(matches("address.zip:1", &user));
    assert!(!matches("address.zip?", &user));
}

#[test]
fn test_nested_record() {
    let user = ann();
    assert!(matches("address.city:Berlin", &user));
    assert!(!matches("address.city:Paris", &user));
    assert!(matches("address?", &user));
    assert!(!matches("address?", &User::default()));
}

#[test]
fn test_omitted_field() {
    let user = ann();
    for query in [
        "password:x",
        "password!=hunter2",
        "password>1",
        "password~x",
        "password:[a, b]",
    ] {
        assert!(matches(query, &user), "Failed for query: {}", query);
    }
    assert!(!matches("password?", &user));
}

#[test]
fn test_missing_field_is_vacuously_true() {
    let user = ann();
    assert!(matches("nickname:bob", &user));
    assert!(matches("not nickname?", &user));
    assert!(matches("address.street:x", &user));
}

#[test]
fn test_null_intermediate() {
    let user = ann();
    assert!(matches("manager.name:anyone", &user));
    assert!(!matches("manager.name?", &user));
    assert!(!matches("manager?", &user));

    let with_manager = User {
        manager: Some(Box::new(ann())),
        ..ann()
    };
    assert!(matches(r#"manager.name:"Ann Smith""#, &with_manager));
    assert!(!matches("manager.name:Bob", &with_manager));
}

#[test]
fn test_exists_uses_zero_values() {
    let user = User::default();
    for field in ["name", "age", "score", "is_verified"] {
        assert!(
            !matches(&format!("{}?", field), &user),
            "Failed for field: {}",
            field
        );
        assert!(
            matches(&format!("{}?", field), &ann()),
            "Failed for field: {}",
            field
        );
    }
}

#[test]
fn test_boolean_combinators() {
    let user = ann();
    assert!(matches("age > 30 and address.city:Berlin", &user));
    assert!(!matches("age > 40 and address.city:Berlin", &user));
    assert!(matches("age > 40 or address.city:Berlin", &user));
    assert!(matches("not (age > 40 or address.city:Paris)", &user));
}

// ============================================================================
// JSON Documents
// ============================================================================

#[test]
fn test_json_documents() {
    let matcher = StdMatcher::new(JsonRouter);
    let doc = json!({
        "status": 200,
        "req": {"fields": {"ext": "jpg"}},
        "tags": ["a"],
        "note": null,
        "ratio": 0.25
    });

    let test_cases = vec![
        ("status:200", true),
        ("status:404", false),
        ("req.fields.ext:[jpg, png]", true),
        ("ratio < 0.3", true),
        ("tags?", true),
        ("note?", false),
        ("note:x", false),
        ("note.inner:x", true),
        ("missing:x", true),
        ("missing?", false),
    ];

    for (query, expected) in test_cases {
        let expr = parse(query).unwrap();
        assert_eq!(
            expr.matches(&doc, &matcher),
            expected,
            "Failed for query: {}",
            query
        );
    }
}
