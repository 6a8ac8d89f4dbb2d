use comp_dom::{Document, HostCapabilities};
use comp_handler::{ComponentHandler, ComponentState, HandlerError, UpgradeOutcome};
use comp_test_utils::{
    cancel_for, element, nested_ab, record_events, recording_config, setup_ab_handler, EventLog, MaterialMenu,
    MaterialTabs, RecordingWidget,
};
use pretty_assertions::assert_eq;

#[test]
fn test_nested_fragment_upgrades_each_element_once() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let (div, span) = nested_ab(&mut doc);

    assert_eq!(handler.upgrade_elements(&mut doc, vec![div]).unwrap(), 2);

    assert_eq!(handler.widget_as::<RecordingWidget>(div, "LogicalA").unwrap().element, div);
    assert_eq!(handler.widget_as::<RecordingWidget>(span, "LogicalB").unwrap().element, span);
    assert_eq!(doc.attribute(div, "data-upgraded").as_deref(), Some("LogicalA"));
    assert_eq!(doc.attribute(span, "data-upgraded").as_deref(), Some("LogicalB"));
    assert_eq!(
        log.entries(),
        vec![format!("construct:LogicalA:{div}"), format!("construct:LogicalB:{span}")]
    );
}

#[test]
fn test_duplicate_marker_class_rejected() {
    let log = EventLog::new();
    let mut handler = ComponentHandler::new();
    handler.register(recording_config("LogicalA", "a", &log)).unwrap();

    let err = handler.register(recording_config("Other", "a", &log)).unwrap_err();
    assert_eq!(err, HandlerError::DuplicateCssClass("a".into()));
    assert!(err.is_registration_error());
    assert_eq!(handler.registry().len(), 1);
}

#[test]
fn test_duplicate_logical_name_rejected() {
    let log = EventLog::new();
    let mut handler = ComponentHandler::new();
    handler.register(recording_config("LogicalA", "a", &log)).unwrap();

    let err = handler.register(recording_config("LogicalA", "z", &log)).unwrap_err();
    assert_eq!(err, HandlerError::DuplicateClassName("LogicalA".into()));
    assert_eq!(handler.registry().len(), 1);
}

#[test]
fn test_second_upgrade_is_noop() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let (div, _span) = nested_ab(&mut doc);

    handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    let again = handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    assert_eq!(again, UpgradeOutcome::Upgraded(Vec::new()));
    assert_eq!(handler.instances_for(div).count(), 1);

    // A whole-document pass also skips it.
    handler.upgrade_dom(&mut doc, None, None).unwrap();
    assert_eq!(handler.instances_for(div).count(), 1);
    assert_eq!(log.count("construct:LogicalA"), 1);
}

#[test]
fn test_downgrade_then_upgrade_again() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let (div, _span) = nested_ab(&mut doc);

    handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    assert_eq!(handler.downgrade_elements(&mut doc, div).unwrap(), 1);
    assert_eq!(handler.state(&doc, div, "LogicalA"), ComponentState::Unupgraded);
    assert_eq!(handler.instances_for(div).count(), 0);

    let outcome = handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    assert_eq!(outcome.instantiated(), 1);
    assert_eq!(handler.state(&doc, div, "LogicalA"), ComponentState::Upgraded);
}

#[test]
fn test_cancel_affects_only_target_sibling() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let root = doc.root();
    let first = element(&mut doc, root, "div", &["a"]);
    let second = element(&mut doc, root, "div", &["a"]);
    cancel_for(&mut doc, "mdl-componentupgrading", first);

    assert_eq!(handler.upgrade_elements(&mut doc, vec![first, second]).unwrap(), 1);
    assert_eq!(handler.instances_for(first).count(), 0);
    assert_eq!(handler.instances_for(second).count(), 1);
    assert!(doc.attribute(first, "data-upgraded").is_none());

    let outcome = handler.upgrade_element(&mut doc, first, None).unwrap();
    assert!(outcome.is_cancelled());
}

#[test]
fn test_parent_and_nested_children_in_document_order() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let root = doc.root();
    let parent = element(&mut doc, root, "section", &["a"]);
    let left = element(&mut doc, parent, "div", &["b"]);
    let deep = element(&mut doc, left, "span", &["a"]);
    let right = element(&mut doc, parent, "div", &["b"]);

    assert_eq!(handler.upgrade_elements(&mut doc, parent).unwrap(), 4);
    assert_eq!(
        log.entries(),
        vec![
            format!("construct:LogicalA:{parent}"),
            format!("construct:LogicalB:{left}"),
            format!("construct:LogicalA:{deep}"),
            format!("construct:LogicalB:{right}"),
        ]
    );
}

#[test]
fn test_lifecycle_events_bubble_to_root() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let root = doc.root();
    let (div, span) = nested_ab(&mut doc);
    record_events(&mut doc, root, "mdl-componentupgrading", &log);
    record_events(&mut doc, root, "mdl-componentupgraded", &log);
    log.clear();

    handler.upgrade_elements(&mut doc, div).unwrap();
    assert_eq!(
        log.entries(),
        vec![
            format!("mdl-componentupgrading:{div}"),
            format!("construct:LogicalA:{div}"),
            format!("mdl-componentupgraded:{div}"),
            format!("mdl-componentupgrading:{span}"),
            format!("construct:LogicalB:{span}"),
            format!("mdl-componentupgraded:{span}"),
        ]
    );
}

#[test]
fn test_legacy_event_host_still_upgrades() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::with_capabilities(HostCapabilities::modern().with_event_constructor(false));
    let (div, span) = nested_ab(&mut doc);
    cancel_for(&mut doc, "mdl-componentupgrading", span);

    assert_eq!(handler.bootstrap(&mut doc).unwrap(), 1);
    assert!(handler.is_upgraded(&doc, div, "LogicalA"));
    assert!(!handler.is_upgraded(&doc, span, "LogicalB"));
}

#[test]
fn test_degraded_host_is_inert() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::with_capabilities(HostCapabilities::legacy());
    let (div, _span) = nested_ab(&mut doc);

    assert_eq!(handler.bootstrap(&mut doc).unwrap(), 0);
    assert!(!doc.has_class(doc.root(), "mdl-js"));
    assert_eq!(handler.upgrade_element(&mut doc, div, None).unwrap(), UpgradeOutcome::Disabled);
    handler.register(recording_config("LogicalC", "c", &log)).unwrap();
    assert_eq!(handler.registry().len(), 2);
    assert!(log.entries().is_empty());
}

#[test]
fn test_typed_components() {
    let mut handler = ComponentHandler::new();
    handler.register_component::<MaterialMenu>().unwrap();
    handler.register_component::<MaterialTabs>().unwrap();

    let mut doc = Document::new();
    let root = doc.root();
    let menu = element(&mut doc, root, "ul", &["mdl-js-menu"]);
    let tabs = element(&mut doc, root, "div", &["mdl-js-tabs"]);
    element(&mut doc, tabs, "a", &["mdl-tabs__tab"]);
    element(&mut doc, tabs, "a", &["mdl-tabs__tab"]);
    element(&mut doc, tabs, "div", &["mdl-tabs__panel"]);

    assert_eq!(handler.bootstrap(&mut doc).unwrap(), 2);
    assert!(doc.has_class(menu, "is-upgraded"));
    assert_eq!(handler.widget_as::<MaterialTabs>(tabs, "MaterialTabs").unwrap().tabs, 2);

    handler
        .widget_as_mut::<MaterialMenu>(menu, "MaterialMenu")
        .unwrap()
        .show(&mut doc);
    assert!(doc.has_class(menu, "is-visible"));
    assert!(handler.widget_as::<MaterialMenu>(menu, "MaterialMenu").unwrap().visible);
}

#[test]
fn test_preupgraded_markup_is_skipped() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let json = r#"{"tag": "div", "classes": ["a"], "attributes": {"data-upgraded": "LogicalA"}}"#;
    let mut doc = Document::from_json(json, HostCapabilities::modern()).unwrap();

    assert_eq!(handler.bootstrap(&mut doc).unwrap(), 0);
    assert!(log.entries().is_empty());
}

#[test]
fn test_upgraded_callbacks_see_element() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let sink = log.clone();
    handler.register_upgraded_callback("LogicalB", move |doc, el| {
        sink.record(format!("callback:{}", doc.tag_name(el).unwrap_or_default()));
    });

    let mut doc = Document::new();
    nested_ab(&mut doc);
    handler.bootstrap(&mut doc).unwrap();
    assert_eq!(log.count("callback:span"), 1);
}

#[test]
fn test_upgrade_callbacks_run_in_order_between_construct_and_event() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    for tag in ["first", "second", "third"] {
        let sink = log.clone();
        handler.register_upgraded_callback("LogicalA", move |_doc, el| {
            sink.record(format!("callback:{tag}:{el}"));
        });
    }

    let mut doc = Document::new();
    let root = doc.root();
    let (div, _span) = nested_ab(&mut doc);
    record_events(&mut doc, root, "mdl-componentupgraded", &log);

    handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    let expected = vec![
        format!("construct:LogicalA:{div}"),
        format!("callback:first:{div}"),
        format!("callback:second:{div}"),
        format!("callback:third:{div}"),
        format!("mdl-componentupgraded:{div}"),
    ];
    assert_eq!(log.entries(), expected);

    handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    handler.upgrade_elements(&mut doc, div).unwrap();
    assert_eq!(log.count("callback:"), 3);
}

#[test]
fn test_cleared_marker_does_not_allow_second_instance() {
    let log = EventLog::new();
    let mut handler = setup_ab_handler(&log);
    let mut doc = Document::new();
    let (div, _span) = nested_ab(&mut doc);

    handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap();
    doc.remove_attribute(div, "data-upgraded").unwrap();

    let err = handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap_err();
    assert!(matches!(err, HandlerError::IllegalTransition { .. }));
    assert_eq!(handler.instances_for(div).count(), 1);
    assert_eq!(log.count("construct:LogicalA"), 1);

    // Downgrade still unwinds the surviving instance.
    assert_eq!(handler.downgrade_elements(&mut doc, div).unwrap(), 1);
    assert_eq!(handler.state(&doc, div, "LogicalA"), ComponentState::Unupgraded);
    assert_eq!(handler.upgrade_element(&mut doc, div, Some("LogicalA")).unwrap().instantiated(), 1);
}
