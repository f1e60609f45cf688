// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use crate::commands::{check_limit, require_user};
use crate::db::{Store, keys};
use crate::models::{CurrentUser, User};
use crate::ratelimit::AUTH_ACTION;
use crate::utils::{new_id, password_digest};
use crate::validate::{validate_email, validate_password, validate_username};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => register(store, sub)?,
        Some(("login", sub)) => login(store, sub)?,
        Some(("logout", _)) => logout(store)?,
        Some(("whoami", _)) => whoami(store)?,
        Some(("passwd", sub)) => passwd(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn register(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let name = match validate_username(sub.get_one::<String>("name").unwrap()) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Invalid registration: name: {}", e);
            return Ok(());
        }
    };
    let email = match validate_email(sub.get_one::<String>("email").unwrap()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Invalid registration: email: {}", e);
            return Ok(());
        }
    };
    let password = sub.get_one::<String>("password").unwrap();
    if let Err(e) = validate_password(password) {
        eprintln!("Invalid registration: password: {}", e);
        return Ok(());
    }

    if !check_limit(store, &email, AUTH_ACTION)? {
        return Ok(());
    }

    let users: Vec<User> = store.get_or_default(keys::USERS);
    if users.iter().any(|u| u.email == email) {
        eprintln!("Email already exists");
        return Ok(());
    }

    let user = User {
        id: new_id(),
        name: name.clone(),
        email: email.clone(),
        password_digest: password_digest(password),
        created_at: Utc::now(),
    };
    let session = CurrentUser {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
    };
    store.transact(keys::USERS, |users: &mut Vec<User>| {
        users.push(user);
    })?;
    store.set(keys::CURRENT_USER, &session)?;
    println!("Account created for {} ({})", name, email);
    Ok(())
}

fn login(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let email = match validate_email(sub.get_one::<String>("email").unwrap()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Invalid login: email: {}", e);
            return Ok(());
        }
    };
    let password = sub.get_one::<String>("password").unwrap();

    if !check_limit(store, &email, AUTH_ACTION)? {
        return Ok(());
    }

    let users: Vec<User> = store.get_or_default(keys::USERS);
    let digest = password_digest(password);
    match users
        .iter()
        .find(|u| u.email == email && u.password_digest == digest)
    {
        Some(user) => {
            let session = CurrentUser {
                id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
            };
            store.set(keys::CURRENT_USER, &session)?;
            println!("Welcome back, {}!", user.name);
        }
        None => eprintln!("Invalid email or password"),
    }
    Ok(())
}

fn logout(store: &mut Store) -> Result<()> {
    store.remove(keys::CURRENT_USER)?;
    println!("Logged out");
    Ok(())
}

fn whoami(store: &Store) -> Result<()> {
    match store.get::<CurrentUser>(keys::CURRENT_USER)? {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not logged in"),
    }
    Ok(())
}

fn passwd(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let session = require_user(store)?;
    let current = sub.get_one::<String>("current").unwrap();
    let new = sub.get_one::<String>("new").unwrap();
    if let Err(e) = validate_password(new) {
        eprintln!("Invalid password: {}", e);
        return Ok(());
    }

    if !check_limit(store, &session.id, AUTH_ACTION)? {
        return Ok(());
    }

    let current_digest = password_digest(current);
    let new_digest = password_digest(new);
    let owner = session.id.clone();
    let changed = store.transact(keys::USERS, |users: &mut Vec<User>| {
        let Some(user) = users.iter_mut().find(|u| u.id == owner) else {
            return Err("account record missing");
        };
        if user.password_digest != current_digest {
            return Err("Current password is incorrect");
        }
        user.password_digest = new_digest;
        Ok(())
    })?;
    match changed {
        Ok(()) => println!("Password updated"),
        Err(msg) => eprintln!("{}", msg),
    }
    Ok(())
}
