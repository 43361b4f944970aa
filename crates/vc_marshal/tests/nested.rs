use vc_marshal::value::{Map, Value};
use vc_marshal::{ErrorKind, FieldType, Marshal};

#[derive(Marshal, Debug, Clone, PartialEq)]
struct Author {
    name: String,
    #[marshal(default)]
    email: Option<String>,
}

fn anonymous() -> Author {
    Author {
        name: "anonymous".into(),
        email: None,
    }
}

#[derive(Marshal, Debug, PartialEq)]
struct Comment {
    body: String,
}

#[derive(Marshal, Debug, PartialEq)]
struct Post {
    title: String,
    author: Author,
    #[marshal(default = anonymous)]
    reviewer: Author,
    co_author: Option<Author>,
    #[marshal(default)]
    comments: Vec<Comment>,
}

fn author(name: &str) -> Value {
    Value::from_iter([("name", name)])
}

fn post<const N: usize>(extra: [(&str, Value); N]) -> Map {
    let mut map: Map = [("title", Value::from("t")), ("author", author("ann"))]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
    map.extend(extra.into_iter().map(|(k, v)| (k.to_owned(), v)));
    map
}

#[test]
fn nested_objects_are_built_from_sub_maps() {
    let post = Post::from_map(post([("co_author", author("bob"))])).unwrap();
    assert_eq!(post.author.name, "ann");
    assert_eq!(post.reviewer, anonymous());
    assert_eq!(post.co_author.as_ref().map(|a| a.name.as_str()), Some("bob"));

    let exported = post.to_map().unwrap();
    assert_eq!(exported["author"].get("name"), Some(&Value::from("ann")));
    assert_eq!(exported["author"].get("email"), Some(&Value::Nil));
    assert_eq!(Post::from_map(exported).unwrap(), post);
}

#[test]
fn nested_failures_carry_the_path() {
    let err = Post::from_map(post([(
        "author",
        Value::from_iter([("email", "a@b.c")]),
    )]))
    .unwrap_err();

    assert_eq!(*err.kind(), ErrorKind::MissingRequiredField { field: "name" });
    assert_eq!(err.frames().len(), 2);
    assert_eq!(err.frames()[0].type_name(), "Author");
    assert_eq!(err.frames()[1].field(), Some("author"));
    assert_eq!(
        err.to_string(),
        "missing required field `name`\n  parsing Author#name\n  parsing Post#author"
    );
}

#[test]
fn defaults_do_not_rescue_nested_failures() {
    let err = Post::from_map(post([("reviewer", Value::Map(Map::new()))])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required field `name`\n  parsing Author#name\n  parsing Post#reviewer"
    );

    // A value that is not a map at all is a plain mismatch and is rescued.
    let post = Post::from_map(post([("reviewer", Value::from(5))])).unwrap();
    assert_eq!(post.reviewer, anonymous());
}

#[test]
fn non_map_without_default_is_a_mismatch() {
    let err = Post::from_map(post([("author", Value::from("ann"))])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected Author for `author`, found \"ann\"\n  parsing Post#author"
    );
}

#[test]
fn optional_nested_accepts_nil() {
    let post = Post::from_map(post([("co_author", Value::Nil)])).unwrap();
    assert_eq!(post.co_author, None);
    assert_eq!(post.to_map().unwrap()["co_author"], Value::Nil);
}

#[test]
fn list_items_are_nested_too() {
    let comments = Value::List(vec![
        Value::from_iter([("body", "first")]),
        Value::from_iter([("body", "second")]),
    ]);
    let built = Post::from_map(post([("comments", comments)])).unwrap();
    assert_eq!(built.comments.len(), 2);
    assert_eq!(built.comments[1].body, "second");

    let comments = Value::List(vec![
        Value::from_iter([("body", "first")]),
        Value::Map(Map::new()),
    ]);
    let err = Post::from_map(post([("comments", comments)])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required field `body`\n  parsing Comment#body\n  parsing Post#comments"
    );
}

#[test]
fn declared_type_links_to_nested_descriptors() {
    let declared = Author::declared_type();
    assert!(declared.is_nested());
    assert_eq!(declared.name(), "Author");

    let info = declared.nested_info().unwrap().unwrap();
    assert_eq!(info.type_name(), "Author");
    assert_eq!(info.field_len(), 2);

    let field = Post::struct_info().unwrap().field("co_author").unwrap();
    assert!(field.declared_type().is_nilable());
    assert!(field.declared_type().is_nested());
}
