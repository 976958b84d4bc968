//! Pointer gesture handling for the crop box.
//!
//! A gesture is one pointer-down → move* → pointer-up sequence. Pointer
//! down on the box body starts a **move**; pointer down on a corner handle
//! starts a **resize**. Mouse and touch input are unified into [`Point`]s
//! in client coordinates before they reach this module.
//!
//! The controller is generic over a subscription type `S`: whatever input
//! listeners the caller needs while a gesture is in progress. The
//! subscription is acquired when the gesture begins, stored inside the
//! active gesture, and dropped by [`GestureController::end`], which is the
//! only way out of a gesture.

use std::convert::Infallible;
use std::fmt;

use crate::geometry::GeometryModel;
use crate::types::{CropRect, MIN_CROP_SIZE, Point, Size};

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Top-left.
    Nw,
    /// Top-right.
    Ne,
    /// Bottom-left.
    Sw,
    /// Bottom-right.
    Se,
}

impl Handle {
    /// All handles, in rendering order.
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Short lowercase name, also used as the handle's CSS class.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nw => "nw",
            Self::Ne => "ne",
            Self::Sw => "sw",
            Self::Se => "se",
        }
    }

    /// Whether dragging this handle moves the left edge.
    const fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this handle moves the top edge.
    const fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The element that received the pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    /// The crop box body (outside any handle).
    Body,
    /// A corner handle.
    Handle(Handle),
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// No gesture in progress.
    Idle,
    /// Moving the box.
    Dragging,
    /// Resizing the box from the given corner.
    Resizing(Handle),
}

/// Errors from starting a gesture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    /// A pointer-down arrived while another gesture was still active.
    #[error("a crop gesture is already in progress")]
    AlreadyActive,

    /// Pointer tracking could not be set up, so the gesture never started.
    #[error("cannot track crop gesture: {0}")]
    Untracked(String),
}

struct ActiveGesture<S> {
    target: GestureTarget,
    origin: Point,
    start: CropRect,
    _subscription: S,
}

/// Converts pointer gestures into crop box updates.
///
/// At most one gesture is active at a time; a second
/// [`begin`](Self::begin) while one is active is rejected and leaves the
/// active gesture untouched.
pub struct GestureController<S> {
    active: Option<ActiveGesture<S>>,
}

impl<S> GestureController<S> {
    /// Create an idle controller.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        match self.active.as_ref().map(|g| g.target) {
            None => GestureState::Idle,
            Some(GestureTarget::Body) => GestureState::Dragging,
            Some(GestureTarget::Handle(h)) => GestureState::Resizing(h),
        }
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a gesture at `at` on `target`.
    ///
    /// `acquire` is called only when the gesture actually starts; its
    /// result is held until [`end`](Self::end).
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::AlreadyActive`] if a gesture is already in
    /// progress. `acquire` is not called in that case.
    pub fn begin(
        &mut self,
        target: GestureTarget,
        at: Point,
        model: &GeometryModel,
        acquire: impl FnOnce() -> S,
    ) -> Result<(), GestureError> {
        self.try_begin(target, at, model, || Ok::<_, Infallible>(acquire()))
    }

    /// Like [`begin`](Self::begin), for subscriptions that can fail.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::AlreadyActive`] as `begin` does, and
    /// [`GestureError::Untracked`] if `acquire` fails. The controller stays
    /// idle in both cases.
    pub fn try_begin<E: fmt::Display>(
        &mut self,
        target: GestureTarget,
        at: Point,
        model: &GeometryModel,
        acquire: impl FnOnce() -> Result<S, E>,
    ) -> Result<(), GestureError> {
        if self.active.is_some() {
            return Err(GestureError::AlreadyActive);
        }
        let subscription = acquire().map_err(|e| GestureError::Untracked(e.to_string()))?;
        self.active = Some(ActiveGesture {
            target,
            origin: at,
            start: model.crop(),
            _subscription: subscription,
        });
        Ok(())
    }

    /// Apply a pointer move. Returns the updated crop box, or `None` when
    /// no gesture is active.
    pub fn update(&self, at: Point, model: &mut GeometryModel) -> Option<CropRect> {
        let gesture = self.active.as_ref()?;
        let dx = at.x - gesture.origin.x;
        let dy = at.y - gesture.origin.y;
        let viewport = model.viewport();
        let crop = match gesture.target {
            GestureTarget::Body => translate(gesture.start, dx, dy, viewport),
            GestureTarget::Handle(handle) => resize(gesture.start, handle, dx, dy, viewport),
        };
        model.set_crop(crop);
        Some(crop)
    }

    /// End the current gesture (pointer-up, touch-end, or interruption).
    ///
    /// Drops the gesture's subscription. Returns `true` if a gesture was
    /// active.
    pub fn end(&mut self) -> bool {
        self.active.take().is_some()
    }
}

impl<S> Default for GestureController<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for GestureController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureController")
            .field("state", &self.state())
            .finish()
    }
}

/// Move `start` by `(dx, dy)`, keeping it inside `viewport`.
///
/// The size never changes.
#[must_use]
pub fn translate(start: CropRect, dx: f64, dy: f64, viewport: Size) -> CropRect {
    let x = (start.x + dx).min(viewport.width - start.width).max(0.0);
    let y = (start.y + dy).min(viewport.height - start.height).max(0.0);
    CropRect::new(x, y, start.width, start.height)
}

/// Resize `start` by dragging `handle` by `(dx, dy)`.
///
/// The edges opposite the handle stay fixed. Each side is floored at
/// [`MIN_CROP_SIZE`]; the position shift for top/left handles is computed
/// from the floored size so the box never jumps. Moving edges stop at the
/// viewport boundary.
#[must_use]
pub fn resize(start: CropRect, handle: Handle, dx: f64, dy: f64, viewport: Size) -> CropRect {
    let (x, width) = if handle.moves_left() {
        let right = start.right();
        let width = (start.width - dx).max(MIN_CROP_SIZE);
        let x = start.x + (start.width - width);
        if x < 0.0 { (0.0, right) } else { (x, width) }
    } else {
        let width = (start.width + dx).max(MIN_CROP_SIZE);
        (start.x, width.min(viewport.width - start.x))
    };

    let (y, height) = if handle.moves_top() {
        let bottom = start.bottom();
        let height = (start.height - dy).max(MIN_CROP_SIZE);
        let y = start.y + (start.height - height);
        if y < 0.0 { (0.0, bottom) } else { (y, height) }
    } else {
        let height = (start.height + dy).max(MIN_CROP_SIZE);
        (start.y, height.min(viewport.height - start.y))
    };

    CropRect::new(x, y, width, height)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    const VIEWPORT: Size = Size::new(400.0, 300.0);

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn model_with_crop(crop: CropRect) -> GeometryModel {
        let mut model = GeometryModel::initialize(VIEWPORT, VIEWPORT);
        model.set_crop(crop);
        model
    }

    /// Counts how many subscriptions are currently alive.
    struct Subscription(Rc<Cell<i32>>);

    impl Subscription {
        fn acquire(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self(Rc::clone(live))
        }
    }

    impl Drop for Subscription {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    const DELTAS: [f64; 9] = [-1000.0, -250.0, -60.0, -1.5, 0.0, 3.25, 75.0, 260.0, 1000.0];

    #[test]
    fn drag_stays_inside_viewport() {
        let start = CropRect::new(100.0, 80.0, 120.0, 90.0);
        for dx in DELTAS {
            for dy in DELTAS {
                let r = translate(start, dx, dy, VIEWPORT);
                assert!(r.fits_within(VIEWPORT), "dx={dx} dy={dy} -> {r:?}");
                assert!(approx(r.width, 120.0) && approx(r.height, 90.0));
            }
        }
    }

    #[test]
    fn drag_follows_pointer_when_unconstrained() {
        let r = translate(CropRect::new(100.0, 80.0, 120.0, 90.0), 30.0, -20.0, VIEWPORT);
        assert_eq!(r, CropRect::new(130.0, 60.0, 120.0, 90.0));
    }

    #[test]
    fn drag_clamps_to_far_edges() {
        let r = translate(CropRect::new(100.0, 80.0, 120.0, 90.0), 900.0, 900.0, VIEWPORT);
        assert!(approx(r.right(), VIEWPORT.width));
        assert!(approx(r.bottom(), VIEWPORT.height));
    }

    #[test]
    fn resize_never_below_minimum() {
        let start = CropRect::new(100.0, 80.0, 120.0, 90.0);
        for handle in Handle::ALL {
            for dx in DELTAS {
                for dy in DELTAS {
                    let r = resize(start, handle, dx, dy, VIEWPORT);
                    assert!(r.width >= MIN_CROP_SIZE, "{handle} {dx},{dy} -> {r:?}");
                    assert!(r.height >= MIN_CROP_SIZE, "{handle} {dx},{dy} -> {r:?}");
                    assert!(r.fits_within(VIEWPORT), "{handle} {dx},{dy} -> {r:?}");
                }
            }
        }
    }

    #[test]
    fn resize_keeps_opposite_edges_fixed() {
        let start = CropRect::new(100.0, 80.0, 120.0, 90.0);
        for dx in DELTAS {
            for dy in DELTAS {
                let se = resize(start, Handle::Se, dx, dy, VIEWPORT);
                assert!(approx(se.x, start.x) && approx(se.y, start.y));

                let sw = resize(start, Handle::Sw, dx, dy, VIEWPORT);
                assert!(approx(sw.right(), start.right()) && approx(sw.y, start.y));

                let ne = resize(start, Handle::Ne, dx, dy, VIEWPORT);
                assert!(approx(ne.x, start.x) && approx(ne.bottom(), start.bottom()));

                let nw = resize(start, Handle::Nw, dx, dy, VIEWPORT);
                assert!(approx(nw.right(), start.right()) && approx(nw.bottom(), start.bottom()));
            }
        }
    }

    #[test]
    fn nw_floor_keeps_bottom_right_corner() {
        let viewport = Size::new(1000.0, 1000.0);
        let start = CropRect::new(100.0, 100.0, 200.0, 200.0);
        let r = resize(start, Handle::Nw, 190.0, 190.0, viewport);
        assert!(approx(r.width, 50.0));
        assert!(approx(r.height, 50.0));
        assert!(approx(r.right(), 300.0));
        assert!(approx(r.bottom(), 300.0));
    }

    #[test]
    fn se_grows_with_pointer() {
        let r = resize(CropRect::new(10.0, 10.0, 100.0, 100.0), Handle::Se, 25.0, 40.0, VIEWPORT);
        assert_eq!(r, CropRect::new(10.0, 10.0, 125.0, 140.0));
    }

    #[test]
    fn floor_on_one_axis_leaves_other_axis_free() {
        // NE: width grows freely while height hits the floor.
        let start = CropRect::new(50.0, 50.0, 100.0, 100.0);
        let r = resize(start, Handle::Ne, 20.0, 80.0, VIEWPORT);
        assert!(approx(r.width, 120.0));
        assert!(approx(r.height, 50.0));
        assert!(approx(r.x, 50.0));
        assert!(approx(r.bottom(), 150.0));
    }

    #[test]
    fn controller_drives_model_through_drag() {
        let mut model = model_with_crop(CropRect::new(100.0, 100.0, 100.0, 100.0));
        let mut controller: GestureController<()> = GestureController::new();
        assert_eq!(controller.state(), GestureState::Idle);

        controller
            .begin(GestureTarget::Body, Point::new(150.0, 150.0), &model, || ())
            .unwrap();
        assert_eq!(controller.state(), GestureState::Dragging);

        let r = controller.update(Point::new(170.0, 140.0), &mut model).unwrap();
        assert_eq!(r, CropRect::new(120.0, 90.0, 100.0, 100.0));
        // Deltas are measured from gesture start, not the previous move.
        let r = controller.update(Point::new(160.0, 150.0), &mut model).unwrap();
        assert_eq!(r, CropRect::new(110.0, 100.0, 100.0, 100.0));
        assert_eq!(model.crop(), r);

        assert!(controller.end());
        assert_eq!(controller.state(), GestureState::Idle);
        assert!(controller.update(Point::new(0.0, 0.0), &mut model).is_none());
        assert_eq!(model.crop(), r);
    }

    #[test]
    fn controller_resize_reports_handle() {
        let mut model = model_with_crop(CropRect::new(100.0, 100.0, 100.0, 100.0));
        let mut controller: GestureController<()> = GestureController::default();
        controller
            .begin(
                GestureTarget::Handle(Handle::Sw),
                Point::new(100.0, 200.0),
                &model,
                || (),
            )
            .unwrap();
        assert_eq!(controller.state(), GestureState::Resizing(Handle::Sw));
        let r = controller.update(Point::new(80.0, 230.0), &mut model).unwrap();
        assert_eq!(r, CropRect::new(80.0, 100.0, 120.0, 130.0));
    }

    #[test]
    fn second_pointer_down_is_rejected() {
        let live = Rc::new(Cell::new(0));
        let mut model = model_with_crop(CropRect::new(100.0, 100.0, 100.0, 100.0));
        let mut controller = GestureController::new();

        controller
            .begin(GestureTarget::Body, Point::new(150.0, 150.0), &model, || {
                Subscription::acquire(&live)
            })
            .unwrap();
        assert_eq!(live.get(), 1);

        let second = controller.begin(
            GestureTarget::Handle(Handle::Se),
            Point::new(200.0, 200.0),
            &model,
            || Subscription::acquire(&live),
        );
        assert_eq!(second, Err(GestureError::AlreadyActive));
        assert_eq!(live.get(), 1, "rejected gesture must not acquire listeners");
        assert_eq!(controller.state(), GestureState::Dragging);

        // The original gesture keeps its origin.
        let r = controller.update(Point::new(160.0, 150.0), &mut model).unwrap();
        assert!(approx(r.x, 110.0));
    }

    #[test]
    fn failed_subscription_leaves_controller_idle() {
        let live = Rc::new(Cell::new(0));
        let mut model = model_with_crop(CropRect::new(100.0, 100.0, 100.0, 100.0));
        let mut controller = GestureController::new();

        let failed = controller.try_begin(
            GestureTarget::Body,
            Point::new(150.0, 150.0),
            &model,
            || Err::<Subscription, _>("no document"),
        );
        assert_eq!(failed, Err(GestureError::Untracked("no document".to_owned())));
        assert_eq!(controller.state(), GestureState::Idle);
        assert!(controller.update(Point::new(170.0, 150.0), &mut model).is_none());

        // The next pointer-down starts normally.
        controller
            .try_begin(GestureTarget::Body, Point::new(150.0, 150.0), &model, || {
                Ok::<_, String>(Subscription::acquire(&live))
            })
            .unwrap();
        assert_eq!(controller.state(), GestureState::Dragging);
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn end_releases_subscription() {
        let live = Rc::new(Cell::new(0));
        let model = model_with_crop(CropRect::new(100.0, 100.0, 100.0, 100.0));
        let mut controller = GestureController::new();

        controller
            .begin(
                GestureTarget::Handle(Handle::Ne),
                Point::new(0.0, 0.0),
                &model,
                || Subscription::acquire(&live),
            )
            .unwrap();
        assert_eq!(live.get(), 1);
        assert!(controller.end());
        assert_eq!(live.get(), 0);
        assert!(!controller.end());
    }

    #[test]
    fn dropping_controller_releases_subscription() {
        let live = Rc::new(Cell::new(0));
        let model = model_with_crop(CropRect::new(100.0, 100.0, 100.0, 100.0));
        {
            let mut controller = GestureController::new();
            controller
                .begin(GestureTarget::Body, Point::new(0.0, 0.0), &model, || {
                    Subscription::acquire(&live)
                })
                .unwrap();
            assert_eq!(live.get(), 1);
        }
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn handle_names_match_css_classes() {
        let names: Vec<_> = Handle::ALL.iter().map(|h| h.name()).collect();
        assert_eq!(names, ["nw", "ne", "sw", "se"]);
    }
}
