use trellis::testing::{labels, records, view};
use trellis::{Document, Map, NodeRef, RowEvent, TreeAdapter, Value};

const LIST: &str = r#"<ul id="root" tv-foreach="items"><li>{{ text }}</li></ul>"#;

fn rows(view: &trellis::View<Document>) -> Vec<String> {
    let tree = view.tree();
    tree.elements(view.root())
        .iter()
        .map(|node| tree.text_content(node))
        .collect()
}

#[test]
fn assign_shrink_and_push() {
    let mut view = view(LIST);

    view.set_data(Map::from_iter([("items", records("text", &["A", "B"]))]))
        .unwrap();
    assert_eq!(rows(&view), vec!["A", "B"]);

    view.data_mut()
        .set("items", records("text", &["C"]))
        .unwrap();
    assert_eq!(rows(&view), vec!["C"]);

    let first = view.tree().children(view.root())[0];
    let text = view.tree().children(&first)[0];
    view.tree_mut().set_text(&text, "kept");

    view.data_mut()
        .list("items")
        .unwrap()
        .unwrap()
        .push(Map::from_iter([("text", "D")]))
        .unwrap();

    assert_eq!(rows(&view), vec!["kept", "D"]);
    assert_eq!(view.tree().children(view.root())[0], first);
    assert_eq!(view.row_count("items"), Some(2));
}

#[test]
fn paths_survive_cloning() {
    for n in [0, 1, 5] {
        let mut view = view(
            r#"<div id="root" tv-foreach="items"><section><h2>-</h2><p><b tv-value-title="{{ text }}">{{ text }}</b></p></section></div>"#,
        );
        let texts = (0..n).map(|i| format!("row {i}")).collect::<Vec<_>>();
        let texts = texts.iter().map(String::as_str).collect::<Vec<_>>();
        view.set_data(Map::from_iter([("items", records("text", &texts))]))
            .unwrap();

        let tree = view.tree();
        let sections = tree.elements(view.root());
        assert_eq!(sections.len(), n);
        for (i, section) in sections.iter().enumerate() {
            let p = tree.elements(section)[1];
            let b = tree.elements(&p)[0];
            assert_eq!(tree.text_content(&b), format!("row {i}"));
            assert_eq!(tree.attribute(&b, "title"), Some(format!("row {i}")));
        }

        // Writes through a row land in that row
        if n > 0 {
            {
                let mut record = view.data_mut();
                let mut items = record.list("items").unwrap().unwrap();
                items.row(n - 1).unwrap().set("text", "last").unwrap();
            }

            let tree = view.tree();
            let last = tree.elements(view.root())[n - 1];
            assert_eq!(tree.text_content(&last), "-last");
        }
    }
}

#[test]
fn list_handle_operations() {
    let mut view = view(LIST);
    view.set_data(Map::from_iter([("items", records("text", &["a", "b", "c", "d"]))]))
        .unwrap();

    {
        let mut record = view.data_mut();
        let mut items = record.list("items").unwrap().unwrap();
        items.remove(0).unwrap();
        items.swap(0, 2).unwrap();
        items.set(1, Map::from_iter([("text", "x")])).unwrap();
        items.truncate(2).unwrap();
        items.truncate(5).unwrap();
        assert!(items.remove(7).is_err());
        assert!(items.swap(0, 9).is_err());
        assert_eq!(items.len(), 2);
    }

    assert_eq!(rows(&view), vec!["d", "x"]);
    assert_eq!(view.data().get_ref::<trellis::List, _>("items").unwrap().len(), 2);
}

#[test]
fn same_list_in_two_repeats() {
    let mut view = view(
        r#"<div id="root"><ul tv-foreach="items"><li>{{ label }}</li></ul><ol tv-foreach="items"><li>#{{ label }}</li></ol></div>"#,
    );
    view.set_data(Map::from_iter([("items", labels(&["a"]))])).unwrap();
    view.data_mut()
        .list("items")
        .unwrap()
        .unwrap()
        .push(Map::from_iter([("label", "b")]))
        .unwrap();

    assert_eq!(
        view.markup(),
        r#"<div id="root"><ul><li>a</li><li>b</li></ul><ol><li>#a</li><li>#b</li></ol></div>"#
    );
}

#[test]
fn mount_directives_read_the_outer_record() {
    let mut view = view(
        r#"<div id="root"><ul tv-foreach="items" tv-value-class="{{ kind }}" tv-true="visible"><li tv-value-class="{{ kind }}">{{ label }}</li></ul></div>"#,
    );
    view.set_data(Map::from_iter([
        ("kind", Value::from("outer")),
        ("visible", Value::from(true)),
        (
            "items",
            Value::from(vec![Map::from_iter([
                ("label", Value::from("a")),
                ("kind", Value::from("inner")),
            ])]),
        ),
    ]))
    .unwrap();

    assert_eq!(
        view.markup(),
        r#"<div id="root"><ul class="outer"><li class="inner">a</li></ul></div>"#
    );

    view.data_mut().set("kind", "changed").unwrap();
    assert_eq!(
        view.markup(),
        r#"<div id="root"><ul class="changed"><li class="inner">a</li></ul></div>"#
    );
}

fn group(name: &str, entries: &[&str]) -> Map {
    Map::from_iter([("name", Value::from(name)), ("entries", labels(entries))])
}

#[test]
fn nested_repeats() {
    let mut view = view(
        r#"<div id="root" tv-foreach="groups"><section><h2>{{ name }}</h2><ul tv-foreach="entries"><li>{{ label }}</li></ul></section></div>"#,
    );
    let baseline = view.tree().node_count();
    view.set_data(Map::from_iter([(
        "groups",
        vec![group("one", &["a", "b"]), group("two", &["c"]), group("three", &[])],
    )]))
    .unwrap();

    assert_eq!(
        view.markup(),
        concat!(
            r#"<div id="root">"#,
            "<section><h2>one</h2><ul><li>a</li><li>b</li></ul></section>",
            "<section><h2>two</h2><ul><li>c</li></ul></section>",
            "<section><h2>three</h2><ul></ul></section>",
            "</div>"
        )
    );

    let removed = view.tree().elements(view.root())[2];
    {
        let mut record = view.data_mut();
        let mut groups = record.list("groups").unwrap().unwrap();
        groups.truncate(1).unwrap();

        // The remaining row still takes updates to its own list
        let mut row = groups.row(0).unwrap();
        let mut entries = row.list("entries").unwrap().unwrap();
        entries.push(Map::from_iter([("label", "z")])).unwrap();
        entries.remove(0).unwrap();
    }

    assert!(!view.tree().is_live(&removed));
    assert_eq!(
        view.markup(),
        r#"<div id="root"><section><h2>one</h2><ul><li>b</li><li>z</li></ul></section></div>"#
    );

    // Shrinking to nothing releases every row node
    view.data_mut().set("groups", Vec::<Value>::new()).unwrap();
    assert_eq!(view.tree().node_count(), baseline);
}

#[test]
fn rows_that_are_not_records() {
    let mut view = view(r#"<p id="root" tv-foreach="items"><b>[{{ text }}]</b></p>"#);
    view.set_data(Map::from_iter([(
        "items",
        Value::from(vec![Value::from(1), Value::from(vec![2, 3])]),
    )]))
    .unwrap();

    assert_eq!(view.markup(), r#"<p id="root"><b>[]</b><b>[]</b></p>"#);
    assert!(view.data_mut().list("items").unwrap().unwrap().row(0).is_none());
}

fn drain(events: &flume::Receiver<RowEvent<NodeRef>>) -> Vec<RowEvent<NodeRef>> {
    events.try_iter().collect()
}

#[test]
fn row_events() {
    let mut doc = Document::parse(
        "<div id=\"root\"><ul id=\"list\" tv-foreach=\"items\">\n  <li>{{ label }}</li>\n</ul></div>",
    )
    .unwrap();
    let list = doc.resolve("#list").unwrap();
    let events = doc.subscribe(&list);

    let mut view = trellis::bind(doc, "#root").unwrap();
    view.set_data(Map::from_iter([("items", labels(&["a", "b"]))]))
        .unwrap();

    let received = drain(&events);
    assert_eq!(received.len(), 2);
    for (event, label) in received.iter().zip(["a", "b"]) {
        assert_eq!(event.nodes.len(), 1);
        assert_eq!(view.tree().text_content(&event.nodes[0]), label);
        assert_eq!(
            event.data,
            Value::from(Map::from_iter([("label", label)]))
        );
    }

    view.data_mut()
        .list("items")
        .unwrap()
        .unwrap()
        .set(0, Map::from_iter([("label", "A")]))
        .unwrap();
    let received = drain(&events);
    assert_eq!(received.len(), 1);
    assert_eq!(view.tree().text_content(&received[0].nodes[0]), "A");
}
