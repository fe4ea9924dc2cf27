//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Network calls are started on background
//! tasks by the `App` methods, so nothing here awaits.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use projectdesk_core::nav::Route;

use crate::app::{
    can_add_description_char, can_add_email_char, can_add_name_char, can_add_password_char,
    can_add_search_char, can_add_value_char, pop_date_digit, push_date_digit, App, AppState,
    EditorFocus, LoginFocus, RegisterFocus, Screen,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if let AppState::ConfirmingDelete(id) = app.state {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.delete_project(id),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Global keys on screens without text fields
    if !app.screen.captures_text() {
        match key.code {
            KeyCode::Char('q') => {
                app.state = AppState::ConfirmingQuit;
                return Ok(false);
            }
            KeyCode::Char('?') => {
                app.state = AppState::ShowingHelp;
                return Ok(false);
            }
            _ => {}
        }
    }

    match app.screen {
        Screen::Login(_) => return Ok(handle_login_input(app, key)),
        Screen::Register(_) => handle_register_input(app, key),
        Screen::Projects(_) => handle_projects_input(app, key),
        Screen::Detail(_) => handle_detail_input(app, key),
        Screen::Editor(_) => handle_editor_input(app, key),
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.apply_search(),
        KeyCode::Backspace => {
            if let Screen::Projects(s) = &mut app.screen {
                s.search.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Screen::Projects(s) = &mut app.screen {
                if can_add_search_char(s.search.chars().count(), c) {
                    s.search.push(c);
                }
            }
        }
        _ => {}
    }
}

/// Returns true if the user asked to quit.
fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    let Screen::Login(s) = &mut app.screen else {
        return false;
    };
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => s.focus = s.focus.next(),
        KeyCode::Up | KeyCode::BackTab => s.focus = s.focus.prev(),
        KeyCode::Enter => match s.focus {
            LoginFocus::Email => s.focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
            LoginFocus::Register => app.go(Route::Register),
        },
        KeyCode::Backspace => match s.focus {
            LoginFocus::Email => {
                s.email.pop();
            }
            LoginFocus::Password => {
                s.password.pop();
            }
            LoginFocus::Button | LoginFocus::Register => {}
        },
        KeyCode::Char(c) => match s.focus {
            LoginFocus::Email => {
                if can_add_email_char(s.email.chars().count(), c) {
                    s.email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(s.password.chars().count(), c) {
                    s.password.push(c);
                }
            }
            LoginFocus::Button | LoginFocus::Register => {
                // Ignore character input on buttons
            }
        },
        _ => {}
    }
    false
}

fn handle_register_input(app: &mut App, key: KeyEvent) {
    let Screen::Register(s) = &mut app.screen else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.go(Route::Login),
        KeyCode::Down | KeyCode::Tab => s.focus = s.focus.next(),
        KeyCode::Up | KeyCode::BackTab => s.focus = s.focus.prev(),
        KeyCode::Enter => match s.focus {
            RegisterFocus::Back => app.go(Route::Login),
            RegisterFocus::Button | RegisterFocus::Confirm => app.submit_registration(),
            _ => s.focus = s.focus.next(),
        },
        KeyCode::Backspace => {
            let field = match s.focus {
                RegisterFocus::Email => &mut s.email,
                RegisterFocus::Password => &mut s.password,
                RegisterFocus::Confirm => &mut s.confirmation,
                RegisterFocus::Button | RegisterFocus::Back => return,
            };
            field.pop();
        }
        KeyCode::Char(c) => match s.focus {
            RegisterFocus::Email => {
                if can_add_email_char(s.email.chars().count(), c) {
                    s.email.push(c);
                }
            }
            RegisterFocus::Password => {
                if can_add_password_char(s.password.chars().count(), c) {
                    s.password.push(c);
                }
            }
            RegisterFocus::Confirm => {
                if can_add_password_char(s.confirmation.chars().count(), c) {
                    s.confirmation.push(c);
                }
            }
            RegisterFocus::Button | RegisterFocus::Back => {}
        },
        _ => {}
    }
}

fn handle_projects_input(app: &mut App, key: KeyEvent) {
    let Screen::Projects(s) = &mut app.screen else {
        return;
    };
    let max_index = s.projects().len().saturating_sub(1);
    let selected = s.selected().map(|p| p.id);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            s.selection = s.selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            s.selection = (s.selection + 1).min(max_index);
        }
        KeyCode::Home => s.selection = 0,
        KeyCode::End => s.selection = max_index,
        KeyCode::Left | KeyCode::PageUp => app.prev_page(),
        KeyCode::Right | KeyCode::PageDown => app.next_page(),
        KeyCode::Enter => {
            if let Some(id) = selected {
                app.go(Route::ProjectDetail(id));
            }
        }
        KeyCode::Char('e') => {
            if let Some(id) = selected {
                app.go(Route::ProjectEdit(id));
            }
        }
        KeyCode::Char('n') => app.go(Route::ProjectNew),
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_delete(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('a') => app.update_query(|p| p.cycle_active_filter()),
        KeyCode::Char('z') => app.update_query(|p| p.cycle_page_size()),
        KeyCode::Char('s') => app.update_query(|p| {
            p.sort.field = p.sort.field.next();
            p.page = 0;
        }),
        KeyCode::Char('S') => app.update_query(|p| {
            p.sort.direction = p.sort.direction.toggle();
            p.page = 0;
        }),
        KeyCode::Char('r') => app.load_projects(),
        KeyCode::Esc => app.shell.dismiss_notification(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    let Screen::Detail(s) = &app.screen else {
        return;
    };
    let id = s.id;
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go(Route::Projects),
        KeyCode::Char('e') => app.go(Route::ProjectEdit(id)),
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_delete(),
        KeyCode::Char('r') => app.go(Route::ProjectDetail(id)),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}

fn handle_editor_input(app: &mut App, key: KeyEvent) {
    let Screen::Editor(s) = &mut app.screen else {
        return;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        app.submit_project();
        return;
    }

    let form = &mut s.form;
    match key.code {
        KeyCode::Esc => {
            let back = s.id.map(Route::ProjectDetail).unwrap_or(Route::Projects);
            app.go(back);
        }
        KeyCode::Down | KeyCode::Tab => s.focus = s.focus.next(),
        KeyCode::Up | KeyCode::BackTab => s.focus = s.focus.prev(),
        KeyCode::Enter => match s.focus {
            EditorFocus::Save => app.submit_project(),
            EditorFocus::Active => form.active = !form.active,
            _ => s.focus = s.focus.next(),
        },
        KeyCode::Backspace => match s.focus {
            EditorFocus::Name => {
                form.name.pop();
            }
            EditorFocus::Description => {
                form.description.pop();
            }
            EditorFocus::Value => {
                form.value.pop();
            }
            EditorFocus::StartDate => form.start_date = pop_date_digit(&form.start_date),
            EditorFocus::EndDate => form.end_date = pop_date_digit(&form.end_date),
            EditorFocus::Active | EditorFocus::Save => {}
        },
        KeyCode::Char(c) => match s.focus {
            EditorFocus::Name => {
                if can_add_name_char(form.name.chars().count(), c) {
                    form.name.push(c);
                }
            }
            EditorFocus::Description => {
                if can_add_description_char(form.description.chars().count(), c) {
                    form.description.push(c);
                }
            }
            EditorFocus::Value => {
                if can_add_value_char(form.value.chars().count(), c) {
                    form.value.push(c);
                }
            }
            EditorFocus::Active => {
                if c == ' ' {
                    form.active = !form.active;
                }
            }
            EditorFocus::StartDate => form.start_date = push_date_digit(&form.start_date, c),
            EditorFocus::EndDate => form.end_date = push_date_digit(&form.end_date, c),
            EditorFocus::Save => {}
        },
        _ => {}
    }
}
