use super::{Binding, BindingKind, BindingPath, Bindings, Config, Directive, Repeat};
use crate::error::Result;
use crate::expressions::{self, render};
use crate::tree::{NodeKind, TreeAdapter};
use crate::values::Map;

/// Walk the tree under `root` (inclusive) and collect every binding.
///
/// Directive attributes are removed from the tree as they are read, and the
/// children of every repeat mount are detached to become its template.
pub fn scan<A: TreeAdapter>(
    tree: &mut A,
    root: &A::Node,
    config: &Config,
) -> Result<Bindings<A::Node>> {
    let mut scanner = Scanner { tree, config };
    let mut bindings = Bindings::default();
    scanner.element(root, BindingPath::root(), &mut bindings)?;
    Ok(bindings)
}

struct Scanner<'a, A> {
    tree: &'a mut A,
    config: &'a Config,
}

impl<'a, A: TreeAdapter> Scanner<'a, A> {
    fn element(
        &mut self,
        node: &A::Node,
        path: BindingPath,
        scope: &mut Bindings<A::Node>,
    ) -> Result<()> {
        let mut repeat = None;

        for (name, value) in self.tree.attributes(node) {
            let Some(directive) = self.config.directive(&name) else {
                continue;
            };
            self.tree.remove_attribute(node, &name);
            let source = value.trim();

            match directive {
                Directive::Repeat if repeat.is_none() => repeat = Some(source.to_string()),
                Directive::Repeat => {
                    #[cfg(feature = "logging")]
                    {
                        log::debug!("ignoring second `{name}` on the element at {path}");
                    }
                }
                Directive::Visible => {
                    let kind = self.visibility(node, source, false);
                    scope.insert([source], self.binding(node, &path, kind));
                }
                Directive::Hidden => {
                    let kind = self.visibility(node, source, true);
                    scope.insert([source], self.binding(node, &path, kind));
                }
                Directive::Toggle(attribute) => {
                    let kind = BindingKind::Toggle {
                        source: source.to_string(),
                        attribute,
                    };
                    scope.insert([source], self.binding(node, &path, kind));
                }
                Directive::Value(attribute) => {
                    let expression = expressions::parse(&value)?;
                    if !expression.has_variables() {
                        let text = render(expression.segments(), &Map::empty());
                        self.tree.set_attribute(node, &attribute, &text);
                        continue;
                    }

                    self.tree.set_attribute(node, &attribute, "");
                    let variables = expression.variables().map(str::to_string).collect::<Vec<_>>();
                    let kind = BindingKind::Attribute {
                        name: attribute,
                        expression,
                    };
                    scope.insert(
                        variables.iter().map(String::as_str),
                        self.binding(node, &path, kind),
                    );
                }
                Directive::Reserved => {
                    #[cfg(feature = "logging")]
                    {
                        log::debug!("ignoring reserved directive `{name}`");
                    }
                }
            }
        }

        match repeat {
            Some(source) => {
                let fragment = self.tree.children(node);
                for child in &fragment {
                    self.tree.detach(child);
                }

                let mut bindings = Bindings::default();
                self.children(&fragment, &BindingPath::root(), &mut bindings)?;

                let kind = BindingKind::Repeat(Repeat {
                    source: source.clone(),
                    fragment,
                    bindings,
                });
                scope.insert([source.as_str()], self.binding(node, &path, kind));
            }
            None => {
                let children = self.tree.children(node);
                self.children(&children, &path, scope)?;
            }
        }

        Ok(())
    }

    /// Scan a list of sibling nodes. Elements are numbered among themselves,
    /// text nodes by their position in `nodes`.
    fn children(
        &mut self,
        nodes: &[A::Node],
        parent: &BindingPath,
        scope: &mut Bindings<A::Node>,
    ) -> Result<()> {
        let mut ordinal = 0;

        for (index, node) in nodes.iter().enumerate() {
            match self.tree.kind(node) {
                NodeKind::Element => {
                    self.element(node, parent.child(ordinal), scope)?;
                    ordinal += 1;
                }
                NodeKind::Text => {
                    let Some(text) = self.tree.text(node) else {
                        continue;
                    };
                    let expression = expressions::parse(&text)?;
                    if !expression.has_variables() {
                        continue;
                    }

                    let variables = expression.variables().map(str::to_string).collect::<Vec<_>>();
                    let kind = BindingKind::Text { expression, index };
                    scope.insert(
                        variables.iter().map(String::as_str),
                        self.binding(node, parent, kind),
                    );
                }
                NodeKind::Other => {}
            }
        }

        Ok(())
    }

    fn visibility(&self, node: &A::Node, source: &str, invert: bool) -> BindingKind<A::Node> {
        BindingKind::Visibility {
            source: source.to_string(),
            display: self.tree.display(node),
            invert,
        }
    }

    fn binding(
        &self,
        node: &A::Node,
        path: &BindingPath,
        kind: BindingKind<A::Node>,
    ) -> Binding<A::Node> {
        Binding {
            node: node.clone(),
            path: path.clone(),
            kind,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::Document;

    fn scan_markup(src: &str) -> (Document, Bindings<crate::tree::NodeRef>) {
        let mut doc = Document::parse(src).unwrap();
        let root = doc.resolve("#root").unwrap();
        let bindings = scan(&mut doc, &root, &Config::default()).unwrap();
        (doc, bindings)
    }

    #[test]
    fn text_bindings() {
        let (_, bindings) =
            scan_markup(r#"<div id="root"><p>Hello {{ name }}</p>plain<p>{{a}}{{b}}</p></div>"#);

        assert_eq!(bindings.len(), 2);
        assert_eq!(
            bindings.index().variables().collect::<Vec<_>>(),
            vec!["name", "a", "b"]
        );

        let (_, first) = bindings.for_variable("name").next().unwrap();
        assert_eq!(first.path, BindingPath::root().child(0));
        assert!(matches!(first.kind, BindingKind::Text { index: 0, .. }));

        let (_, second) = bindings.for_variable("b").next().unwrap();
        assert_eq!(second.path, BindingPath::root().child(1));
    }

    #[test]
    fn directives_are_stripped() {
        let (doc, bindings) = scan_markup(
            r#"<div id="root"><p tv-true="shown" tv-future="x" class="c" tv-value-title="{{ t }}"></p></div>"#,
        );
        let p = doc.resolve("p").unwrap();

        assert_eq!(
            doc.attributes(&p),
            vec![
                ("class".to_string(), "c".to_string()),
                ("title".to_string(), String::new())
            ]
        );
        assert!(bindings.index().contains("shown"));
        assert!(bindings.index().contains("t"));
        assert!(!bindings.index().contains("x"));
    }

    #[test]
    fn constant_value_directive() {
        let (doc, bindings) =
            scan_markup(r#"<div id="root"><p tv-value-title="fixed {{"></p></div>"#);
        let p = doc.resolve("p").unwrap();
        assert_eq!(doc.attribute(&p, "title").as_deref(), Some("fixed {{"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn repeat_detaches_template() {
        let (doc, bindings) = scan_markup(
            r#"<div id="root"><ul id="list" tv-foreach="items" tv-value-class="{{ kind }}"><li>{{ label }}</li></ul><p>{{ label }}</p></div>"#,
        );
        let ul = doc.resolve("#list").unwrap();
        assert!(doc.children(&ul).is_empty());

        // The value directive on the mount belongs to the outer scope
        assert!(bindings.index().contains("kind"));
        assert_eq!(bindings.index().get("label").len(), 1);

        let (_, binding) = bindings.for_variable("items").next().unwrap();
        let BindingKind::Repeat(repeat) = &binding.kind else {
            panic!("expected a repeat binding");
        };
        assert_eq!(repeat.fragment.len(), 1);
        assert_eq!(repeat.bindings.len(), 1);

        let (_, inner) = repeat.bindings.for_variable("label").next().unwrap();
        assert_eq!(inner.path, BindingPath::root().child(0));
    }

    #[test]
    fn nested_repeats() {
        let (_, bindings) = scan_markup(
            r#"<div id="root" tv-foreach="outer"><section><b>{{ title }}</b><i tv-foreach="inner">{{ x }}</i></section></div>"#,
        );

        let (_, binding) = bindings.for_variable("outer").next().unwrap();
        let BindingKind::Repeat(outer) = &binding.kind else {
            panic!("expected a repeat binding");
        };
        assert!(outer.bindings.index().contains("title"));
        assert!(!outer.bindings.index().contains("x"));

        let (_, binding) = outer.bindings.for_variable("inner").next().unwrap();
        assert_eq!(binding.path, BindingPath::root().child(0).child(1));
        let BindingKind::Repeat(inner) = &binding.kind else {
            panic!("expected a repeat binding");
        };
        assert!(inner.bindings.index().contains("x"));
    }

    #[test]
    fn malformed_text_is_literal() {
        let (_, bindings) = scan_markup(r#"<div id="root"><p>{{ not closed</p></div>"#);
        assert!(bindings.is_empty());
    }
}
