mod cli {
    #[derive(Clone, Copy, Debug)]
    pub enum Format {
        Text,
        Json,
    }
}

#[path = "../src/cli/collection.rs"]
mod collection;

use libdocket::{DocumentStore, Docket};
use tempfile::tempdir;

#[test]
fn collection_run_copies_and_deletes() {
    let tmp = tempdir().unwrap();
    let docket = Docket::open_at(tmp.path().join("unit.db")).unwrap();
    docket.add("src/one", r#"{"v": 1}"#).unwrap();
    docket.add("src/one/kids/k1", r#"{"v": 2}"#).unwrap();

    let copy = collection::CollectionCmd::Copy(collection::CopyArgs {
        src: "src".into(),
        dst: "dst".into(),
    });
    collection::run(&copy, &docket, cli::Format::Text).unwrap();
    assert_eq!(docket.list("dst").unwrap(), ["one"]);
    assert_eq!(docket.list("dst/one/kids").unwrap(), ["k1"]);

    let rm = collection::CollectionCmd::Delete(collection::PathArgs { path: "src".into() });
    collection::run(&rm, &docket, cli::Format::Json).unwrap();
    assert!(docket.list("src").unwrap().is_empty());
    // sub-collections of deleted documents stay behind
    let kids = libdocket::CollectionPath::parse("src/one/kids").unwrap();
    assert_eq!(docket.store().list_documents(&kids, None).unwrap().len(), 1);
}
