use trellis::testing::view;
use trellis::{bind, Display, Document, Map, TreeAdapter, Value};

#[test]
fn render_text_and_attributes() {
    let mut view = view(
        r#"<div id="root"><h1 tv-value-title="{{ first }} {{ last }}">Hello {{ first }}!</h1><p>{{ missing }}</p></div>"#,
    );

    view.set_data(Map::from_iter([("first", "Ada"), ("last", "Lovelace")]))
        .unwrap();

    assert_eq!(
        view.markup(),
        r#"<div id="root"><h1 title="Ada Lovelace">Hello Ada!</h1><p></p></div>"#
    );
}

#[test]
fn conditionals() {
    let mut view = view(
        r#"<p id="root">{{ ok ? "yes" : "no" }}|{{ ok ? 'on' }}|{{ ok ? name }}</p>"#,
    );

    view.set_data(Map::from_iter([("ok", Value::from(true)), ("name", Value::from("x"))]))
        .unwrap();
    assert_eq!(view.markup(), r#"<p id="root">yes|on|x</p>"#);

    view.data_mut().set("ok", false).unwrap();
    assert_eq!(view.markup(), r#"<p id="root">no||</p>"#);
}

#[test]
fn field_writes_update_only_their_bindings() {
    let mut view = view(r#"<div id="root"><b>{{ a }}</b><i>{{ b }}</i></div>"#);
    view.set_data(Map::from_iter([("a", 1), ("b", 2)])).unwrap();

    // Written behind the view's back, so a re-render would be visible
    let i = view.tree().resolve("i").unwrap();
    let text = view.tree().children(&i)[0];
    view.tree_mut().set_text(&text, "untouched");

    view.data_mut().set("a", 10).unwrap();
    assert_eq!(
        view.markup(),
        r#"<div id="root"><b>10</b><i>untouched</i></div>"#
    );
    assert_eq!(view.data().get("a"), Some(&Value::from(10)));
}

#[test]
fn full_assignment_is_idempotent() {
    let mut view = view(
        r#"<div id="root"><p tv-true="show" tv-set-hidden="hide" tv-value-class="{{ kind }}">{{ text }}</p><ul tv-foreach="rows"><li>{{ text }}</li></ul></div>"#,
    );
    let data = Map::from_iter([
        ("show", Value::from(true)),
        ("hide", Value::from(true)),
        ("kind", Value::from("big")),
        ("text", Value::from("hi")),
        ("rows", trellis::testing::records("text", &["a", "b"])),
    ]);

    view.set_data(data.clone()).unwrap();
    let once = view.markup();
    let count = view.tree().node_count();

    view.set_data(data).unwrap();
    assert_eq!(view.markup(), once);
    assert_eq!(view.tree().node_count(), count);
    assert_eq!(
        once,
        r#"<div id="root"><p class="big" hidden="">hi</p><ul><li>a</li><li>b</li></ul></div>"#
    );
}

#[test]
fn visibility_restores_scanned_display() {
    let mut doc = Document::parse(
        r#"<div id="root"><p id="shown" tv-true="on"></p><p id="kept" tv-not-true="on"></p></div>"#,
    )
    .unwrap();
    let kept = doc.resolve("#kept").unwrap();
    doc.set_display(&kept, Display::Hide);

    let mut view = bind(doc, "#root").unwrap();
    let shown = view.tree().resolve("#shown").unwrap();

    view.data_mut().set("on", false).unwrap();
    assert_eq!(view.tree().display(&shown), Display::Exclude);
    assert_eq!(view.tree().display(&kept), Display::Hide);

    view.data_mut().set("on", true).unwrap();
    assert_eq!(view.tree().display(&shown), Display::Show);
    assert_eq!(view.tree().display(&kept), Display::Exclude);

    view.data_mut().set("on", Value::Null).unwrap();
    assert_eq!(view.tree().display(&kept), Display::Hide);
}

#[test]
fn truthiness() {
    let mut view = view(r#"<p id="root" tv-true="v"></p>"#);
    let root = *view.root();

    let cases = [
        (Value::from(0), false),
        (Value::from(0.0), false),
        (Value::from(f64::NAN), false),
        (Value::from(""), false),
        (Value::Null, false),
        (Value::from(false), false),
        (Value::from(3), true),
        (Value::from("0"), true),
        (Value::from(Vec::<Value>::new()), true),
        (Value::from(Map::empty()), true),
    ];

    for (value, shown) in cases {
        view.data_mut().set("v", value.clone()).unwrap();
        let expected = if shown { Display::Show } else { Display::Exclude };
        assert_eq!(view.tree().display(&root), expected, "{value:?}");
    }
}

#[test]
fn toggle_attribute() {
    let mut view = view(r#"<form id="root"><input type="checkbox" tv-set-checked="done"></form>"#);

    view.data_mut().set("done", true).unwrap();
    assert_eq!(
        view.markup(),
        r#"<form id="root"><input type="checkbox" checked=""></form>"#
    );

    view.data_mut().set("done", false).unwrap();
    assert_eq!(
        view.markup(),
        r#"<form id="root"><input type="checkbox"></form>"#
    );
}

#[test]
fn update_in_place() {
    let mut view = view(r#"<p id="root">{{ count }}</p>"#);

    for _ in 0..3 {
        view.data_mut()
            .update("count", |count| {
                let next = match count {
                    Value::Number(trellis::Number::Signed(n)) => *n + 1,
                    _ => 1,
                };
                *count = Value::from(next);
            })
            .unwrap();
    }

    assert_eq!(view.markup(), r#"<p id="root">3</p>"#);
}

#[test]
fn values_render_as_strings() {
    let mut view = view(r#"<p id="root">{{ int }} {{ float }} {{ whole }} {{ list }} {{ map }} {{ flag }}</p>"#);
    view.set_data(Map::from_iter([
        ("int", Value::from(-4)),
        ("float", Value::from(1.5)),
        ("whole", Value::from(2.0)),
        ("list", Value::from(vec![1, 2, 3])),
        ("map", Value::from(Map::empty())),
        ("flag", Value::from(true)),
    ]))
    .unwrap();

    assert_eq!(
        view.markup(),
        r#"<p id="root">-4 1.5 2 1,2,3 [object] true</p>"#
    );
}
