//! End-to-end delegation behavior through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use scopecast::testing::{RecordingSink, TestNode};
use scopecast::{
    Content, DelegationRegistry, Disposer, Event, ListenerBindings, MountPoint, NodeId, ScopeNode,
    ScopeWrapper, Selector, events, prepare,
};

fn mounted_scope() -> (
    DelegationRegistry<TestNode>,
    Rc<ScopeWrapper<TestNode>>,
    TestNode,
) {
    let registry = DelegationRegistry::new();
    let root = TestNode::new("div");
    let wrapper = ScopeWrapper::new(registry.clone(), root.clone());
    wrapper.mount();
    (registry, wrapper, root)
}

fn click(target: &TestNode) -> Event<TestNode> {
    Event::new("click", Some(target.clone()))
}

#[test]
fn one_proxy_is_shared_between_subscribers() {
    let (registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let first = RecordingSink::new();
    let second = RecordingSink::new();
    let _a = first.attach(&registry.subscribe(None, "click"));
    let _b = second.attach(&registry.subscribe(None, "click"));

    // Two subscribers, one proxy, one native binding.
    assert_eq!(registry.active_kinds().len(), 1);
    assert_eq!(wrapper.attached().len(), 1);

    wrapper.deliver(click(&button));
    assert_eq!(first.count(), 1);
    assert_eq!(second.count(), 1);
}

#[test]
fn refcounted_teardown_detaches_listener_with_last_subscriber() {
    let (registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let first = RecordingSink::new();
    let second = RecordingSink::new();
    let a = first.attach(&registry.subscribe(None, "click"));
    let b = second.attach(&registry.subscribe(None, "click"));

    a.dispose();
    wrapper.deliver(click(&button));
    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);
    assert_eq!(registry.active_kinds().len(), 1);

    b.dispose();
    assert!(registry.active_kinds().is_empty());
    registry.refresh_listeners(None);
    assert!(wrapper.attached().is_empty());
    assert!(wrapper.attached().handler_for(&"click".into()).is_none());
}

#[test]
fn subscription_before_mount_misses_no_events() {
    let registry = DelegationRegistry::new();
    let sink = RecordingSink::new();
    let _sub = sink.attach(&registry.subscribe(None, "click"));

    let root = TestNode::new("div");
    let wrapper = ScopeWrapper::new(registry.clone(), root.clone());
    wrapper.mount();
    // Binding was synchronized at mount time, not lazily.
    assert_eq!(wrapper.attached().len(), 1);

    let button = TestNode::new("button");
    root.append_child(&button);
    wrapper.deliver(click(&button));
    assert_eq!(sink.count(), 1);
}

#[test]
fn unmounting_last_node_completes_streams_exactly_once() {
    let (registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let sink = RecordingSink::new();
    let _sub = sink.attach(&registry.subscribe(None, "click"));

    wrapper.unmount();
    assert_eq!(sink.completions(), 1);
    assert!(registry.active_kinds().is_empty());

    // Nothing is delivered after teardown, and repeated unmount is a no-op.
    wrapper.deliver(click(&button));
    wrapper.unmount();
    assert_eq!(sink.count(), 0);
    assert_eq!(sink.completions(), 1);
}

#[test]
fn nested_scopes_are_isolated_in_both_directions() {
    let outer_registry = DelegationRegistry::new();
    let inner_registry = DelegationRegistry::new();

    let outer_root = TestNode::new("div");
    let inner_root = TestNode::new("div");
    let outer_button = TestNode::new("button");
    let inner_button = TestNode::new("button");
    outer_root.append_child(&outer_button);
    outer_root.append_child(&inner_root);
    inner_root.append_child(&inner_button);

    let outer_wrapper = ScopeWrapper::new(outer_registry.clone(), outer_root.clone());
    let inner_wrapper = ScopeWrapper::new(inner_registry.clone(), inner_root.clone());
    outer_wrapper.mount();
    inner_wrapper.mount();

    let outer_sink = RecordingSink::new();
    let inner_sink = RecordingSink::new();
    let _o = outer_sink.attach(&outer_registry.subscribe(None, "click"));
    let _i = inner_sink.attach(&inner_registry.subscribe(None, "click"));

    // A click inside the nested subtree bubbles to both roots but reaches
    // only the inner subscriber.
    inner_wrapper.deliver(click(&inner_button));
    outer_wrapper.deliver(click(&inner_button));
    assert_eq!(inner_sink.count(), 1);
    assert_eq!(outer_sink.count(), 0);

    // A click in the outer tree reaches only the outer subscriber.
    outer_wrapper.deliver(click(&outer_button));
    assert_eq!(outer_sink.count(), 1);
    assert_eq!(inner_sink.count(), 1);
}

#[test]
fn selector_filters_by_target() {
    let (registry, wrapper, root) = mounted_scope();
    let plain = TestNode::new("div");
    let button = TestNode::new("button").with_class("btn");
    root.append_child(&plain);
    root.append_child(&button);

    let sink = RecordingSink::new();
    let selector = Selector::parse(".btn").unwrap();
    let _sub = sink.attach(&registry.subscribe(Some(selector), "click"));

    wrapper.deliver(click(&plain));
    assert_eq!(sink.count(), 0);

    wrapper.deliver(click(&button));
    assert_eq!(sink.count(), 1);
    let delivered = &sink.events()[0];
    assert_eq!(delivered.target.as_ref().unwrap().id(), button.id());
    assert_eq!(
        delivered.current_target.as_ref().unwrap().id(),
        root.id()
    );
}

#[test]
fn unprepared_tree_yields_inert_stream() {
    let stream = events(None::<&DelegationRegistry<TestNode>>, None, "click");
    let sink = RecordingSink::new();
    let sub = sink.attach(&stream);
    sub.dispose();
    sub.dispose();
    assert_eq!(sink.count(), 0);
    assert_eq!(sink.completions(), 0);
}

#[test]
fn double_disposal_and_unknown_unmount_are_noops() {
    let (registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let sink = RecordingSink::new();
    let other = RecordingSink::new();
    let sub = sink.attach(&registry.subscribe(None, "click"));
    let _other = other.attach(&registry.subscribe(None, "click"));

    sub.dispose();
    sub.dispose();
    registry.unmount(NodeId(u64::MAX));

    wrapper.deliver(click(&button));
    assert_eq!(sink.count(), 0);
    assert_eq!(other.count(), 1);
    assert_eq!(registry.mounted_count(), 1);
}

#[test]
fn sibling_disposed_mid_dispatch_misses_that_event() {
    let (registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let stream = registry.subscribe(None, "click");
    let sibling: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));
    let first_hits = Rc::new(Cell::new(0));

    let hits = Rc::clone(&first_hits);
    let to_kill = Rc::clone(&sibling);
    let _killer = stream.subscribe(move |_| {
        hits.set(hits.get() + 1);
        if let Some(disposer) = to_kill.borrow().as_ref() {
            disposer.dispose();
        }
    });

    let victim = RecordingSink::new();
    let victim_sub = victim.attach(&stream);
    sibling.borrow_mut().replace(victim_sub);

    wrapper.deliver(click(&button));
    assert_eq!(first_hits.get(), 1);
    assert_eq!(victim.count(), 0);
}

#[test]
fn outer_scope_reclaims_subtree_after_inner_unmount() {
    let (outer_registry, outer_wrapper, outer_root) = mounted_scope();
    let inner_root = TestNode::new("div");
    let leaf = TestNode::new("button");
    outer_root.append_child(&inner_root);
    inner_root.append_child(&leaf);

    let inner_registry = DelegationRegistry::new();
    let inner_wrapper = ScopeWrapper::new(inner_registry.clone(), inner_root.clone());
    inner_wrapper.mount();

    let outer_sink = RecordingSink::new();
    let _sub = outer_sink.attach(&outer_registry.subscribe(None, "click"));

    // Shielded while the inner wrapper is live.
    outer_wrapper.deliver(click(&leaf));
    assert_eq!(outer_sink.count(), 0);

    // The boundary marker comes off with the inner wrapper's output, so
    // the outer scope now owns the subtree.
    inner_wrapper.unmount();
    outer_wrapper.deliver(click(&leaf));
    assert_eq!(outer_sink.count(), 1);

    // Remounting re-renders the marker and shields again.
    inner_wrapper.mount();
    outer_wrapper.deliver(click(&leaf));
    assert_eq!(outer_sink.count(), 1);
}

#[test]
fn wrapper_dropped_without_unmount_is_pruned() {
    let (registry, wrapper, _root) = mounted_scope();
    assert_eq!(registry.mounted_count(), 1);

    drop(wrapper);
    assert_eq!(registry.mounted_count(), 0);

    // Wiring a new kind skips the dead entry without faulting.
    let sink = RecordingSink::new();
    let _sub = sink.attach(&registry.subscribe(None, "click"));
    assert_eq!(registry.active_kinds().len(), 1);
}

#[test]
fn scope_can_be_rebuilt_after_full_teardown() {
    let (registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let first = RecordingSink::new();
    let _old = first.attach(&registry.subscribe(None, "click"));
    wrapper.unmount();
    assert_eq!(first.completions(), 1);

    let second = RecordingSink::new();
    let _new = second.attach(&registry.subscribe(None, "click"));
    wrapper.mount();
    wrapper.deliver(click(&button));
    assert_eq!(second.count(), 1);
    assert_eq!(first.count(), 0);
}

#[test]
fn swapping_registries_remounts_and_completes_old_scope() {
    let (old_registry, wrapper, root) = mounted_scope();
    let button = TestNode::new("button");
    root.append_child(&button);

    let old_sink = RecordingSink::new();
    let _old = old_sink.attach(&old_registry.subscribe(None, "click"));

    // Same identity: nothing happens.
    wrapper.swap_registry(old_registry.clone());
    assert_eq!(old_sink.completions(), 0);

    let new_registry = DelegationRegistry::new();
    wrapper.swap_registry(new_registry.clone());
    assert_eq!(old_sink.completions(), 1);
    assert_eq!(old_registry.mounted_count(), 0);
    assert_eq!(new_registry.mounted_count(), 1);
    assert!(wrapper.is_mounted());

    let new_sink = RecordingSink::new();
    let _new = new_sink.attach(&new_registry.subscribe(None, "click"));
    wrapper.deliver(click(&button));
    assert_eq!(new_sink.count(), 1);
    assert_eq!(old_sink.count(), 0);
}

#[test]
fn mount_is_idempotent() {
    let (registry, wrapper, _root) = mounted_scope();
    wrapper.mount();
    assert_eq!(registry.mounted_count(), 1);
    wrapper.unmount();
    assert_eq!(registry.mounted_count(), 0);
}

#[test]
fn prepare_wraps_exactly_once() {
    let registry = DelegationRegistry::new();
    let root = TestNode::new("div");
    let wrapper = prepare(&registry, Content::Raw(root));
    let again = prepare(&registry, Content::Wrapped(Rc::clone(&wrapper)));
    assert!(Rc::ptr_eq(&wrapper, &again));
}

/// A mount point that counts how often bindings are re-applied, to pin the
/// shallow-comparison behavior of `refresh_listeners`.
struct CountingMount {
    root: TestNode,
    attached: RefCell<ListenerBindings<TestNode>>,
    applies: Cell<usize>,
}

impl CountingMount {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            root: TestNode::new("div"),
            attached: RefCell::new(ListenerBindings::empty()),
            applies: Cell::new(0),
        })
    }
}

impl MountPoint<TestNode> for CountingMount {
    fn node_id(&self) -> NodeId {
        self.root.id()
    }

    fn scope_root(&self) -> TestNode {
        self.root.clone()
    }

    fn attached(&self) -> ListenerBindings<TestNode> {
        self.attached.borrow().clone()
    }

    fn apply(&self, bindings: ListenerBindings<TestNode>) {
        self.applies.set(self.applies.get() + 1);
        self.attached.replace(bindings);
    }
}

#[test]
fn unchanged_binding_sets_are_not_reapplied() {
    let registry: DelegationRegistry<TestNode> = DelegationRegistry::new();
    let mount = CountingMount::new();
    registry.mount(Rc::clone(&mount) as Rc<dyn MountPoint<TestNode>>);
    assert_eq!(mount.applies.get(), 0);

    let clicks = registry.subscribe(None, "click");
    let _a = clicks.subscribe(|_| {});
    assert_eq!(mount.applies.get(), 1);
    assert_eq!(mount.attached.borrow().props().collect::<Vec<_>>(), ["onClick"]);

    // Second subscriber for the same kind: same shape, no re-apply.
    let _b = clicks.subscribe(|_| {});
    assert_eq!(mount.applies.get(), 1);

    // Explicit refresh with an unchanged proxy set is also a no-op.
    registry.refresh_listeners(None);
    assert_eq!(mount.applies.get(), 1);

    // A new kind changes the shape.
    let keys = registry.subscribe(None, "keydown");
    let sub = keys.subscribe(|_| {});
    assert_eq!(mount.applies.get(), 2);

    // Dropping the last keydown observer changes it back.
    sub.dispose();
    assert_eq!(mount.applies.get(), 3);
    assert_eq!(mount.attached.borrow().len(), 1);
}

#[test]
fn listener_props_come_from_the_name_table() {
    let registry: DelegationRegistry<TestNode> = DelegationRegistry::new();
    let mount = CountingMount::new();
    registry.mount(Rc::clone(&mount) as Rc<dyn MountPoint<TestNode>>);

    let _a = registry.subscribe(None, "dblclick").subscribe(|_| {});
    let _b = registry.subscribe(None, "custom-beacon").subscribe(|_| {});

    let props: Vec<String> = mount
        .attached
        .borrow()
        .props()
        .map(str::to_owned)
        .collect();
    // Sorted by prop key; unrecognized kinds pass through unchanged.
    assert_eq!(props, ["custom-beacon", "onDoubleClick"]);
}
