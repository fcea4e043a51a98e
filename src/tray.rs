use thiserror::Error;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem},
    Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
};

const TOOLTIP: &str = "System Monitor";
const ICON_SIZE: u32 = 32;

#[derive(Error, Debug)]
pub enum TrayError {
    #[error("failed to build tray menu: {0}")]
    Menu(#[from] tray_icon::menu::Error),
    #[error("invalid tray icon image: {0}")]
    BadIcon(#[from] tray_icon::BadIcon),
    #[error("failed to create tray icon: {0}")]
    Tray(#[from] tray_icon::Error),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrayCommand {
    ToggleWindow,
    ToggleLock,
    ShowAbout,
    Quit,
}

// The lock menu item is the one piece of derived tray state; it is re-texted
// on every lock toggle so it can never drift from the overlay's flag.
pub fn lock_label(locked: bool) -> &'static str {
    if locked {
        "Desbloquear posición"
    } else {
        "Bloquear posición"
    }
}

pub struct Tray {
    _icon: TrayIcon,
    lock_item: MenuItem,
    toggle_id: MenuId,
    lock_id: MenuId,
    about_id: MenuId,
    quit_id: MenuId,
}

impl Tray {
    pub fn new() -> Result<Self, TrayError> {
        let menu = Menu::new();
        let toggle_item = MenuItem::new("Mostrar/Ocultar", true, None);
        let lock_item = MenuItem::new(lock_label(false), true, None);
        let about_item = MenuItem::new("Acerca de", true, None);
        let quit_item = MenuItem::new("Salir", true, None);
        menu.append(&toggle_item)?;
        menu.append(&lock_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&about_item)?;
        menu.append(&quit_item)?;

        let icon = Icon::from_rgba(render_icon_rgba(), ICON_SIZE, ICON_SIZE)?;
        let tray_icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(TOOLTIP)
            .with_icon(icon)
            .build()?;

        Ok(Self {
            _icon: tray_icon,
            toggle_id: toggle_item.id().clone(),
            lock_id: lock_item.id().clone(),
            about_id: about_item.id().clone(),
            quit_id: quit_item.id().clone(),
            lock_item,
        })
    }

    // Drains both global tray channels. Must run on the UI thread, which is
    // also the thread pumping the native event loop.
    pub fn poll(&self) -> Vec<TrayCommand> {
        let mut commands = Vec::new();
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if event.id == self.toggle_id {
                commands.push(TrayCommand::ToggleWindow);
            } else if event.id == self.lock_id {
                commands.push(TrayCommand::ToggleLock);
            } else if event.id == self.about_id {
                commands.push(TrayCommand::ShowAbout);
            } else if event.id == self.quit_id {
                commands.push(TrayCommand::Quit);
            }
        }
        while let Ok(event) = TrayIconEvent::receiver().try_recv() {
            // A plain left click on the icon mirrors the Mostrar/Ocultar entry.
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                commands.push(TrayCommand::ToggleWindow);
            }
        }
        commands
    }

    pub fn sync_lock_label(&self, locked: bool) {
        self.lock_item.set_text(lock_label(locked));
    }
}

// 32x32 RGBA glyph drawn in code: four meter bars on a dark rounded tile.
// Keeping the icon procedural avoids shipping an image asset next to the
// executable.
fn render_icon_rgba() -> Vec<u8> {
    const BAR_HEIGHTS: [u32; 4] = [14, 20, 10, 24];
    const BAR_COLOR: [u8; 4] = [0x3b, 0xd1, 0x6f, 0xff];
    const TILE_COLOR: [u8; 4] = [0x10, 0x10, 0x14, 0xe0];

    let mut data = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let corner = (x < 3 || x >= ICON_SIZE - 3) && (y < 3 || y >= ICON_SIZE - 3);
            let filled = bar_index(x)
                .map_or(false, |i| (ICON_SIZE - 4 - BAR_HEIGHTS[i]..ICON_SIZE - 4).contains(&y));
            if corner {
                data.extend_from_slice(&[0, 0, 0, 0]);
            } else if filled {
                data.extend_from_slice(&BAR_COLOR);
            } else {
                data.extend_from_slice(&TILE_COLOR);
            }
        }
    }
    data
}

fn bar_index(x: u32) -> Option<usize> {
    match x {
        4..=8 => Some(0),
        11..=15 => Some(1),
        18..=22 => Some(2),
        25..=29 => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_label_follows_the_flag() {
        assert_eq!(lock_label(false), "Bloquear posición");
        assert_eq!(lock_label(true), "Desbloquear posición");
    }

    #[test]
    fn lock_label_alternates_in_lockstep_with_toggling() {
        let mut locked = false;
        assert_eq!(lock_label(locked), "Bloquear posición");
        locked = !locked;
        assert_eq!(lock_label(locked), "Desbloquear posición");
        locked = !locked;
        assert_eq!(lock_label(locked), "Bloquear posición");
    }

    #[test]
    fn icon_buffer_is_fully_populated_rgba() {
        let data = render_icon_rgba();
        assert_eq!(data.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        // The tile interior is opaque-ish, the corners are transparent.
        assert_eq!(data[3], 0);
        let center = ((16 * ICON_SIZE + 16) * 4 + 3) as usize;
        assert_ne!(data[center], 0);
    }
}
