//! Event key to generated class mapping.
//!
//! The aggregator registers one entry per declared event so that incoming
//! frames can be deserialized into the right class. Events without a payload
//! all share the convention's marker class.

use std::collections::BTreeMap;

use crate::convention::NamingConvention;
use crate::resolver::GenerationContext;
use crate::schema::Protocol;

/// A wire event key (`"Page.loadEventFired"`) and the fully qualified class
/// that deserializes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMapping {
    pub event_key: String,
    pub class_name: String,
}

/// Build the mapping for every event of every domain, sorted by key.
///
/// The key embeds the domain name, so each declared event yields exactly one
/// entry. A `BTreeMap` keeps the order independent of declaration order.
pub fn build_event_map(
    protocol: &Protocol,
    ctx: GenerationContext<'_>,
    convention: &dyn NamingConvention,
) -> Vec<EventMapping> {
    let marker = convention.qualify_root(ctx.base_namespace, convention.marker_event_class());
    let mut mappings: BTreeMap<String, String> = BTreeMap::new();

    for domain in &protocol.domains {
        for event in &domain.events {
            let key = format!("{}.{}", domain.name, event.name);
            let class_name = if event.has_payload() {
                convention.qualify(
                    ctx.base_namespace,
                    &domain.name,
                    &convention.event_class(&event.name),
                )
            } else {
                marker.clone()
            };

            if mappings.insert(key.clone(), class_name).is_some() {
                tracing::warn!(event = %key, "duplicate event declaration, keeping the last one");
            }
        }
    }

    tracing::debug!(
        declared = protocol.event_count(),
        events = mappings.len(),
        "built event map"
    );

    mappings
        .into_iter()
        .map(|(event_key, class_name)| EventMapping {
            event_key,
            class_name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{KotlinArray, KotlinList};
    use crate::schema::parse_protocol;

    const NS: &str = "pl.wendigo.chrome";

    fn pairs(map: &[EventMapping]) -> Vec<(&str, &str)> {
        map.iter()
            .map(|m| (m.event_key.as_str(), m.class_name.as_str()))
            .collect()
    }

    #[test]
    fn foo_bar_baz() {
        let protocol = parse_protocol(
            r#"{"domains": [{
                "domain": "Foo",
                "events": [
                    {"name": "Bar"},
                    {"name": "Baz", "parameters": [{"name": "x", "type": "integer"}]}
                ]
            }]}"#,
        )
        .unwrap();

        let map = build_event_map(&protocol, GenerationContext::new(NS), &KotlinList);
        assert_eq!(
            pairs(&map),
            [
                ("Foo.Bar", "pl.wendigo.chrome.ProtocolEvent"),
                ("Foo.Baz", "pl.wendigo.chrome.domain.foo.BazEvent"),
            ]
        );
    }

    #[test]
    fn sorted_by_key_across_domains() {
        let protocol = parse_protocol(
            r#"{"domains": [
                {"domain": "Page", "events": [{"name": "loadEventFired"}, {"name": "frameNavigated"}]},
                {"domain": "CSS", "events": [{"name": "styleSheetAdded"}, {"name": "fontsUpdated"}]},
                {"domain": "Animation", "events": [{"name": "animationCanceled"}]}
            ]}"#,
        )
        .unwrap();

        let map = build_event_map(&protocol, GenerationContext::new(NS), &KotlinList);
        let keys: Vec<&str> = map.iter().map(|m| m.event_key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "Animation.animationCanceled",
                "CSS.fontsUpdated",
                "CSS.styleSheetAdded",
                "Page.frameNavigated",
                "Page.loadEventFired",
            ]
        );
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(map.len(), protocol.event_count());
    }

    #[test]
    fn marker_class_follows_convention() {
        let protocol = parse_protocol(
            r#"{"domains": [{"domain": "DOM", "events": [{"name": "documentUpdated"}]}]}"#,
        )
        .unwrap();

        let map = build_event_map(&protocol, GenerationContext::new(NS), &KotlinArray);
        assert_eq!(
            pairs(&map),
            [("DOM.documentUpdated", "pl.wendigo.chrome.ChromeProtocolEvent")]
        );
    }

    #[test]
    fn payload_class_is_qualified_under_owning_domain() {
        let protocol = parse_protocol(
            r#"{"domains": [{"domain": "DOMStorage", "events": [
                {"name": "domStorageItemAdded", "parameters": [{"name": "key", "type": "string"}]}
            ]}]}"#,
        )
        .unwrap();

        let map = build_event_map(&protocol, GenerationContext::new("com.example"), &KotlinList);
        assert_eq!(
            map[0].class_name,
            "com.example.domain.domstorage.DomStorageItemAddedEvent"
        );
    }

    #[test]
    fn empty_protocol_has_no_mappings() {
        let map = build_event_map(&Protocol::default(), GenerationContext::new(NS), &KotlinList);
        assert!(map.is_empty());
    }
}
