//! tests cli_collection.rs
//! `docket collection …` through the real binary.

use predicates::str;
use tempfile::tempdir;

mod util;
use util::{add, docket};

#[test]
fn recursive_copy_mirrors_tree() {
    let tmp = tempdir().unwrap();
    add(&tmp, "/users/alice", r#"{"name":"Alice"}"#);
    add(&tmp, "/users/alice/posts/p1", r#"{"title":"first"}"#);
    // parent without body
    add(&tmp, "/users/ghost/notes/n1", r#"{"text":"boo"}"#);

    docket(&tmp)
        .args(["collection", "cp", "/users", "/backup"])
        .assert()
        .success()
        .stdout(str::contains("Copied 3 document(s)"));

    docket(&tmp)
        .args(["document", "get", "/backup/alice/posts/p1"])
        .assert()
        .success()
        .stdout(str::contains("first"));
    docket(&tmp)
        .args(["document", "get", "/backup/ghost/notes/n1"])
        .assert()
        .success()
        .stdout(str::contains("boo"));
}

#[test]
fn list_and_delete() {
    let tmp = tempdir().unwrap();
    for id in ["c", "a", "b"] {
        add(&tmp, &format!("/items/{id}"), "{}");
    }

    docket(&tmp)
        .args(["col", "ls", "/items"])
        .assert()
        .success()
        .stdout("a\nb\nc\n");

    docket(&tmp)
        .args(["--format", "json", "col", "ls", "/items"])
        .assert()
        .success()
        .stdout("[\"a\",\"b\",\"c\"]\n");

    docket(&tmp)
        .args(["collection", "rm", "/items"])
        .assert()
        .success()
        .stdout(str::contains("Deleted 3 document(s)"));

    docket(&tmp)
        .args(["collection", "ls", "/items"])
        .assert()
        .success()
        .stdout(str::is_empty());
}

#[test]
fn query_filters_and_sorts() {
    let tmp = tempdir().unwrap();
    add(&tmp, "/people/ann", r#"{"age":34,"city":"Oslo"}"#);
    add(&tmp, "/people/bo", r#"{"age":19,"city":"Oslo"}"#);
    add(&tmp, "/people/cy", r#"{"age":52,"city":"Rome"}"#);

    docket(&tmp)
        .args([
            "--format", "json", "collection", "q", "/people", "-f", "age>=20", "-s", "age", "-d",
            "desc",
        ])
        .assert()
        .success()
        .stdout(
            "[{\"id\":\"cy\",\"data\":{\"age\":52,\"city\":\"Rome\"}},\
             {\"id\":\"ann\",\"data\":{\"age\":34,\"city\":\"Oslo\"}}]\n",
        );

    docket(&tmp)
        .args(["collection", "query", "/people", "--filters", "city==Oslo", "--limit", "1"])
        .assert()
        .success()
        .stdout("ann {\"age\":34,\"city\":\"Oslo\"}\n");
}
