//! Resource-lifecycle tests against a counting GL double.
//!
//! A live OpenGL context is not available under `cargo test`, so these tests
//! drive the allocation seam with a double that hands out sequential handles
//! and records every create/delete. What they pin down: every created handle
//! is released exactly once, the vertex array goes before the buffers it
//! references, destruction is idempotent, and the frame cycle delivers the
//! documented one-frame point-size lag across a full init → render → shutdown
//! sequence.

use std::cell::RefCell;

use frame_surface::{FrameCycle, GlObjects, SceneResources};
use pretty_assertions::assert_eq;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Event {
    CreateBuffer(u32),
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    DeleteVertexArray(u32),
    DeleteProgram(u32),
}

/// Hands out sequential handles and records every call.
#[derive(Default)]
struct CountingGl {
    next_handle: RefCell<u32>,
    events: RefCell<Vec<Event>>,
}

impl CountingGl {
    fn next(&self) -> u32 {
        let mut next = self.next_handle.borrow_mut();
        *next += 1;
        *next
    }

    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Handles created and not yet deleted.
    fn live_handles(&self) -> i64 {
        self.events()
            .iter()
            .map(|event| match event {
                Event::CreateBuffer(_) | Event::CreateVertexArray(_) => 1,
                Event::DeleteBuffer(_) | Event::DeleteVertexArray(_) => -1,
                Event::DeleteProgram(_) => 0,
            })
            .sum()
    }
}

impl GlObjects for CountingGl {
    type Buffer = u32;
    type VertexArray = u32;
    type Program = u32;

    fn create_buffer(&self) -> Result<u32, String> {
        let handle = self.next();
        self.events.borrow_mut().push(Event::CreateBuffer(handle));
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: u32) {
        self.events.borrow_mut().push(Event::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let handle = self.next();
        self.events
            .borrow_mut()
            .push(Event::CreateVertexArray(handle));
        Ok(handle)
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.events
            .borrow_mut()
            .push(Event::DeleteVertexArray(vertex_array));
    }

    fn delete_program(&self, program: u32) {
        self.events.borrow_mut().push(Event::DeleteProgram(program));
    }
}

const PROGRAM: u32 = 4242;

#[test]
fn allocate_then_destroy_releases_every_handle_once() {
    let gl = CountingGl::default();
    let mut resources = SceneResources::allocate(&gl, PROGRAM).expect("allocation");

    // Four buffers and one vertex array.
    let creates: Vec<_> = gl
        .events()
        .iter()
        .filter(|event| matches!(event, Event::CreateBuffer(_) | Event::CreateVertexArray(_)))
        .copied()
        .collect();
    assert_eq!(creates.len(), 5);

    resources.destroy(&gl);
    assert!(resources.is_destroyed());
    assert_eq!(gl.live_handles(), 0);

    // Each created handle has exactly one matching delete.
    for event in creates {
        let expected = match event {
            Event::CreateBuffer(handle) => Event::DeleteBuffer(handle),
            Event::CreateVertexArray(handle) => Event::DeleteVertexArray(handle),
            other => panic!("unexpected event: {other:?}"),
        };
        let count = gl.events().iter().filter(|e| **e == expected).count();
        assert_eq!(count, 1, "missing or duplicated delete for {event:?}");
    }

    // The owned program went with the bundle.
    assert_eq!(
        gl.events()
            .iter()
            .filter(|e| **e == Event::DeleteProgram(PROGRAM))
            .count(),
        1
    );
}

#[test]
fn vertex_array_is_released_before_the_buffers_it_references() {
    let gl = CountingGl::default();
    let mut resources = SceneResources::allocate(&gl, PROGRAM).expect("allocation");
    resources.destroy(&gl);

    let events = gl.events();
    let vao_delete = events
        .iter()
        .position(|e| matches!(e, Event::DeleteVertexArray(_)))
        .expect("vertex array was deleted");
    let first_buffer_delete = events
        .iter()
        .position(|e| matches!(e, Event::DeleteBuffer(_)))
        .expect("buffers were deleted");

    assert!(vao_delete < first_buffer_delete);
}

#[test]
fn destroy_is_idempotent() {
    let gl = CountingGl::default();
    let mut resources = SceneResources::allocate(&gl, PROGRAM).expect("allocation");

    resources.destroy(&gl);
    let after_first = gl.events().len();
    resources.destroy(&gl);
    resources.destroy(&gl);

    assert_eq!(gl.events().len(), after_first);
    assert_eq!(gl.live_handles(), 0);
}

#[test]
fn two_frame_scenario_applies_the_slider_one_frame_late() {
    let gl = CountingGl::default();
    let mut resources = SceneResources::allocate(&gl, PROGRAM).expect("allocation");
    let mut cycle = FrameCycle::new();

    // Frame one: timer tick, paint, slider drag to 50 while rendering.
    assert!(cycle.tick());
    assert_eq!(cycle.begin_frame(), 30.0);
    cycle.set_point_size(50.0);
    cycle.finish_frame();

    // Frame two rasterizes with the committed value.
    assert!(cycle.tick());
    assert_eq!(cycle.begin_frame(), 50.0);
    cycle.finish_frame();

    resources.destroy(&gl);
    assert_eq!(gl.live_handles(), 0);
}
