//! Pointer routing demo
//!
//! Two overlapping windows. Click a window to raise it, drag its border to
//! move it, click the buttons to count. Press `q` to quit.
//!
//! Run with: `cargo run --example pointer_demo`

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::KeyCode;
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use spark_views::{
    disable_mouse_capture, enable_mouse_capture, poll_event, route_event, InputEvent, MouseConfig,
    MouseFlags, MouseHandlers, Point, PointerDecoder, PointerRoutingContext, Rect, Thickness,
    ViewFlags, ViewId, ViewTree,
};

fn to_io(err: spark_views::ViewError) -> io::Error {
    io::Error::other(err)
}

fn add_window(tree: &mut ViewTree, root: ViewId, frame: Rect, title: &str) -> spark_views::Result<ViewId> {
    let window = tree.add_view(root, frame)?;
    tree.set_inset(window, Thickness::uniform(1))?;
    tree.insert_flags(window, ViewFlags::OVERLAPPED)?;
    tree.set_name(window, title)?;

    // Dragging the border moves the window
    let border = tree.add_decoration(window, Rect::new(0, 0, frame.width, frame.height), Thickness::uniform(1))?;
    let anchor: Rc<Cell<Option<Point>>> = Rc::new(Cell::new(None));
    tree.set_handlers(
        border,
        MouseHandlers::new().on_mouse_event(move |cx, event| {
            let Some(origin) = cx.tree().screen_frame(window).map(|f| f.origin()) else {
                return false;
            };
            if event.flags.contains(MouseFlags::REPORT_MOUSE_POSITION) {
                if let (Some(anchor), true) = (anchor.get(), event.flags.is_button_down()) {
                    let moved = event.screen_position.relative_to(anchor);
                    let size = cx.tree().get(window).map(|n| n.frame()).unwrap_or_default();
                    return cx
                        .tree_mut()
                        .set_frame(window, Rect::new(moved.x, moved.y, size.width, size.height))
                        .is_ok();
                }
                false
            } else if event.flags.contains(MouseFlags::BUTTON1_PRESSED) {
                anchor.set(Some(event.screen_position.relative_to(origin)));
                cx.grab()
            } else if event.flags.contains(MouseFlags::BUTTON1_RELEASED) {
                anchor.set(None);
                cx.request_ungrab()
            } else {
                false
            }
        }),
    )?;

    let button = tree.add_view(window, Rect::new(1, 1, 16, 1))?;
    tree.set_name(button, "[ clicked 0 ]")?;
    let clicks = Rc::new(Cell::new(0u32));
    tree.set_handlers(
        button,
        MouseHandlers::new().on_mouse_event(move |cx, event| {
            if !event.flags.contains(MouseFlags::BUTTON1_CLICKED) {
                return false;
            }
            clicks.set(clicks.get() + 1);
            let view = cx.view();
            cx.tree_mut().set_name(view, format!("[ clicked {} ]", clicks.get())).is_ok()
        }),
    )?;

    Ok(window)
}

fn put(out: &mut impl Write, x: i32, y: i32, text: &str) -> io::Result<()> {
    if x < 0 || y < 0 {
        return Ok(());
    }
    queue!(out, cursor::MoveTo(x as u16, y as u16), Print(text))
}

fn draw_view(tree: &ViewTree, view: ViewId, out: &mut impl Write) -> io::Result<()> {
    let Some(node) = tree.get(view) else { return Ok(()) };
    if !node.is_visible() {
        return Ok(());
    }
    let Some(frame) = tree.screen_frame(view) else { return Ok(()) };

    if !node.decorations().is_empty() && frame.width >= 2 && frame.height >= 2 {
        let inner = "─".repeat((frame.width - 2) as usize);
        let blank = " ".repeat((frame.width - 2) as usize);
        put(out, frame.x, frame.y, &format!("┌{inner}┐"))?;
        for row in 1..frame.height - 1 {
            put(out, frame.x, frame.y + row, &format!("│{blank}│"))?;
        }
        put(out, frame.x, frame.y + frame.height - 1, &format!("└{inner}┘"))?;
        if let Some(title) = node.name() {
            put(out, frame.x + 2, frame.y, title)?;
        }
    } else if let (Some(label), Some(_)) = (node.name(), tree.parent(view)) {
        put(out, frame.x, frame.y, label)?;
    }

    for &child in node.children() {
        draw_view(tree, child, out)?;
    }
    Ok(())
}

fn draw(tree: &ViewTree, out: &mut impl Write) -> io::Result<()> {
    queue!(out, terminal::Clear(ClearType::All))?;
    if let Some(root) = tree.root() {
        draw_view(tree, root, out)?;
    }
    put(out, 0, 0, "drag borders to move, click to raise, q to quit")?;
    out.flush()
}

fn run(tree: &mut ViewTree, routing: &mut PointerRoutingContext, out: &mut impl Write) -> io::Result<()> {
    let mut decoder = PointerDecoder::new(routing.config());
    loop {
        draw(tree, out)?;
        let Some(event) = poll_event(&mut decoder, Duration::from_millis(50))? else {
            continue;
        };
        match event {
            InputEvent::Key(key) if key.code == KeyCode::Char('q') => return Ok(()),
            InputEvent::Resize(width, height) => {
                if let Some(root) = tree.root() {
                    tree.set_frame(root, Rect::new(0, 0, i32::from(width), i32::from(height)))
                        .map_err(to_io)?;
                }
            }
            event => {
                route_event(routing, tree, &event);
            }
        }
    }
}

fn main() -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let mut tree = ViewTree::new();
    let root = tree
        .set_root(Rect::new(0, 0, i32::from(width), i32::from(height)))
        .map_err(to_io)?;
    add_window(&mut tree, root, Rect::new(4, 2, 30, 8), " one ").map_err(to_io)?;
    add_window(&mut tree, root, Rect::new(20, 6, 30, 8), " two ").map_err(to_io)?;

    let mut routing = PointerRoutingContext::new(MouseConfig::default());
    let mut out = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    enable_mouse_capture()?;

    let result = run(&mut tree, &mut routing, &mut out);

    disable_mouse_capture()?;
    execute!(out, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    routing.reset();
    result
}
