//! System tray module for Wallswitch.
//!
//! Provides the tray icon and its menu. The menu runs on the thread that
//! created it and is driven by a Win32 message pump; menu clicks arrive on the
//! [`MenuEvent`] channel and icon clicks on the [`TrayIconEvent`] channel.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tray_icon::menu::{
    CheckMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu,
};
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage, WM_QUIT,
};

use crate::config::{
    DisplayMode, INTERVAL_PRESETS, ImageOrder, Settings, SettingsError, SettingsSource,
    SettingsStore,
};
use crate::error::WallswitchError;
use crate::modules::wallpaper::list_images_in_directory;

/// Delay between two passes of the message pump.
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

/// Edge length of the generated tray icon.
const ICON_SIZE: u32 = 32;

/// Something the user asked for through the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrayAction {
    Open,
    Order(ImageOrder),
    DisplayMode(DisplayMode),
    Interval(u64),
    Exit,
}

/// Maps an event on the icon itself to an action.
fn action_for_icon(event: &TrayIconEvent) -> Option<TrayAction> {
    match event {
        TrayIconEvent::Click { button, button_state, .. } => click_action(*button, *button_state),
        _ => None,
    }
}

/// A released left click opens the folder picker; the right click belongs to the menu.
const fn click_action(button: MouseButton, state: MouseButtonState) -> Option<TrayAction> {
    match (button, state) {
        (MouseButton::Left, MouseButtonState::Up) => Some(TrayAction::Open),
        _ => None,
    }
}

/// The tray icon with its menu.
///
/// Dropping the tray removes the icon from the notification area.
pub struct Tray {
    store: Arc<SettingsStore>,
    open_id: MenuId,
    exit_id: MenuId,
    order_items: Vec<(ImageOrder, CheckMenuItem)>,
    mode_items: Vec<(DisplayMode, CheckMenuItem)>,
    interval_items: Vec<(u64, CheckMenuItem)>,
    _icon: TrayIcon,
}

impl Tray {
    /// Builds the menu and shows the tray icon.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu or the icon cannot be created.
    pub fn new(store: Arc<SettingsStore>) -> Result<Self, WallswitchError> {
        let settings = store.snapshot();
        let menu = Menu::new();

        let open_item = MenuItem::new("Open", true, None);

        let order_menu = Submenu::new("Order", true);
        let order_items: Vec<_> = ImageOrder::ALL
            .into_iter()
            .map(|order| (order, CheckMenuItem::new(order.label(), true, order == settings.order, None)))
            .collect();
        for (_, item) in &order_items {
            order_menu.append(item).map_err(menu_error)?;
        }

        let mode_menu = Submenu::new("Display Mode", true);
        let mode_items: Vec<_> = DisplayMode::ALL
            .into_iter()
            .map(|mode| {
                (mode, CheckMenuItem::new(mode.label(), true, mode == settings.display_mode, None))
            })
            .collect();
        for (_, item) in &mode_items {
            mode_menu.append(item).map_err(menu_error)?;
        }

        let interval_menu = Submenu::new("Interval", true);
        let interval_items: Vec<_> = INTERVAL_PRESETS
            .into_iter()
            .map(|(secs, label)| (secs, CheckMenuItem::new(label, true, secs == settings.interval, None)))
            .collect();
        for (_, item) in &interval_items {
            interval_menu.append(item).map_err(menu_error)?;
        }

        let exit_item = MenuItem::new("Exit", true, None);

        menu.append(&open_item).map_err(menu_error)?;
        menu.append(&PredefinedMenuItem::separator()).map_err(menu_error)?;
        menu.append(&order_menu).map_err(menu_error)?;
        menu.append(&mode_menu).map_err(menu_error)?;
        menu.append(&interval_menu).map_err(menu_error)?;
        menu.append(&PredefinedMenuItem::separator()).map_err(menu_error)?;
        menu.append(&exit_item).map_err(menu_error)?;

        let icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_tooltip("Wallswitch")
            .with_icon(build_icon()?)
            .build()
            .map_err(|e| WallswitchError::Tray(e.to_string()))?;

        tracing::debug!("system tray initialized");

        Ok(Self {
            store,
            open_id: open_item.id().clone(),
            exit_id: exit_item.id().clone(),
            order_items,
            mode_items,
            interval_items,
            _icon: icon,
        })
    }

    /// Pumps window messages and handles menu and icon clicks until the user
    /// exits.
    ///
    /// A settings file that could not be loaded is reported first. When no
    /// valid directory is configured the folder picker opens next.
    pub fn run(&self) {
        if let Some(err) = self.store.load_error() {
            show_message(
                MessageLevel::Warning,
                "Settings not loaded",
                &format!("{err}\n\nThe default settings are used until you save new ones."),
            );
        }

        if !self.store.snapshot().has_valid_directory() {
            tracing::info!("no valid wallpaper directory, asking for one");
            self.open();
        }

        let menu_events = MenuEvent::receiver();
        let icon_events = TrayIconEvent::receiver();
        loop {
            if !pump_messages() {
                tracing::info!("quit message received");
                return;
            }

            while let Ok(event) = icon_events.try_recv() {
                if let Some(action) = action_for_icon(&event) {
                    self.handle(action);
                }
            }

            while let Ok(event) = menu_events.try_recv() {
                let Some(action) = self.action_for(&event.id) else {
                    continue;
                };

                if action == TrayAction::Exit {
                    tracing::info!("exit requested via system tray");
                    return;
                }
                self.handle(action);
            }

            std::thread::sleep(PUMP_INTERVAL);
        }
    }

    fn action_for(&self, id: &MenuId) -> Option<TrayAction> {
        if *id == self.open_id {
            return Some(TrayAction::Open);
        }
        if *id == self.exit_id {
            return Some(TrayAction::Exit);
        }
        if let Some((order, _)) = self.order_items.iter().find(|(_, item)| item.id() == id) {
            return Some(TrayAction::Order(*order));
        }
        if let Some((mode, _)) = self.mode_items.iter().find(|(_, item)| item.id() == id) {
            return Some(TrayAction::DisplayMode(*mode));
        }
        self.interval_items
            .iter()
            .find(|(_, item)| item.id() == id)
            .map(|(secs, _)| TrayAction::Interval(*secs))
    }

    fn handle(&self, action: TrayAction) {
        match action {
            TrayAction::Open => self.open(),
            TrayAction::Order(order) => self.save_change(|s| s.order = order),
            TrayAction::DisplayMode(mode) => self.save_change(|s| s.display_mode = mode),
            TrayAction::Interval(secs) => self.save_change(|s| s.interval = secs),
            TrayAction::Exit => {}
        }
    }

    /// Lets the user pick the wallpaper folder, then saves it.
    fn open(&self) {
        let current = self.store.snapshot();
        let mut dialog = FileDialog::new().set_title("Choose the wallpaper folder");
        if let Some(dir) = current.directory_path().filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(dir);
        }

        let Some(dir) = dialog.pick_folder() else {
            tracing::debug!("folder selection cancelled");
            return;
        };

        match self.save_directory(&dir) {
            Ok(count) => {
                tracing::info!(directory = %dir.display(), images = count, "wallpaper directory saved");
                show_message(
                    MessageLevel::Info,
                    "Settings saved",
                    &format!("Wallpapers will rotate from {} ({count} images).", dir.display()),
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save wallpaper directory");
                show_message(MessageLevel::Error, "Invalid settings", &err.to_string());
            }
        }
    }

    /// Validates and saves `dir`, returning the number of images it holds.
    fn save_directory(&self, dir: &Path) -> Result<usize, WallswitchError> {
        let count = list_images_in_directory(dir)
            .map_err(|_| SettingsError::InvalidDirectory(dir.display().to_string()))?
            .len();
        let directory = dir.display().to_string();
        self.store.update(|s| s.directory = directory)?;
        Ok(count)
    }

    fn save_change<F>(&self, change: F)
    where F: FnOnce(&mut Settings) {
        match self.store.update(change) {
            Ok(settings) => {
                tracing::info!(
                    order = %settings.order,
                    display_mode = %settings.display_mode,
                    interval = settings.interval,
                    "settings saved"
                );
                self.sync_checks(&settings);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save settings");
                self.sync_checks(&self.store.snapshot());
                show_message(MessageLevel::Error, "Failed to save settings", &err.to_string());
            }
        }
    }

    /// Makes the check marks reflect `settings`. Order and display mode have
    /// exactly one checked item; an interval set outside the presets has none.
    fn sync_checks(&self, settings: &Settings) {
        for (order, item) in &self.order_items {
            item.set_checked(*order == settings.order);
        }
        for (mode, item) in &self.mode_items {
            item.set_checked(*mode == settings.display_mode);
        }
        for (secs, item) in &self.interval_items {
            item.set_checked(*secs == settings.interval);
        }
    }
}

/// Handles every pending window message. Returns `false` once `WM_QUIT` arrives.
fn pump_messages() -> bool {
    // SAFETY: `MSG` is plain data; an all-zero value is valid and is
    // overwritten by `PeekMessageW` before it is read.
    let mut msg: MSG = unsafe { std::mem::zeroed() };

    // SAFETY: `msg` outlives the calls and a null window handle selects every
    // window owned by this thread.
    unsafe {
        while PeekMessageW(&raw mut msg, std::ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
            if msg.message == WM_QUIT {
                return false;
            }
            TranslateMessage(&raw const msg);
            DispatchMessageW(&raw const msg);
        }
    }

    true
}

/// Builds the tray icon: a rounded tile with a diagonal gradient.
fn build_icon() -> Result<Icon, WallswitchError> {
    let max = ICON_SIZE - 1;
    let image = image::RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let corner = (x == 0 || x == max) && (y == 0 || y == max);
        if corner {
            return image::Rgba([0, 0, 0, 0]);
        }
        let t = u8::try_from((x + y) * 255 / (2 * max)).unwrap_or(u8::MAX);
        image::Rgba([40, 120_u8.saturating_add(t / 2), 255 - t / 3, 255])
    });

    Icon::from_rgba(image.into_raw(), ICON_SIZE, ICON_SIZE)
        .map_err(|e| WallswitchError::Tray(e.to_string()))
}

fn show_message(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn menu_error(err: tray_icon::menu::Error) -> WallswitchError { WallswitchError::Tray(err.to_string()) }
