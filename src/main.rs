// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `mindmap` command shell over a folder-backed diagram store.

use std::error::Error;

use mindmap::canvas::{NodeLayout, ScreenPoint, ViewTransform};
use mindmap::config::{self, Command, Config};
use mindmap::model::{Graph, Node, NodeId};
use mindmap::ops::{rename_node, ApplyError};
use mindmap::persist::{shared_graph, GatewayOptions, PersistenceGateway};
use mindmap::store::FolderStore;
use mindmap::ui::{ConnectGesture, DropTarget, GestureEnd};
use tracing_subscriber::EnvFilter;

const DEMO_NODE_WIDTH: f64 = 150.0;
const DEMO_NODE_HEIGHT: f64 = 40.0;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "mindmap".to_owned());

    let config = match config::from_env(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{program}: {err}\n");
            eprintln!("{}", config::usage(&program));
            std::process::exit(2);
        }
    };

    init_tracing();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(config))
    })();

    if let Err(err) = result {
        eprintln!("{program}: {err}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let store = FolderStore::new(&config.store_dir)
        .with_collection(config.collection.clone())
        .with_durability(config.durability);
    let options = GatewayOptions {
        request_timeout: config.request_timeout,
    };
    let gateway = PersistenceGateway::with_options(shared_graph(Graph::new()), store, options);

    match config.command {
        Command::List => {
            for summary in gateway.list_saved().await {
                println!("{}\t{}", summary.id, summary.display_name());
            }
        }
        Command::New { name } => {
            gateway.new_diagram().await;
            let outcome = gateway.save(&name).await?;
            println!("{}", outcome.id());
        }
        Command::Show { id } => {
            gateway.load(&id).await?;
            print_tree(&*gateway.graph().lock().await);
        }
        Command::Demo { name } => {
            {
                let mut graph = gateway.graph().lock().await;
                grow_demo_tree(&mut graph)?;
            }
            let outcome = gateway.save(&name).await?;
            print_tree(&*gateway.graph().lock().await);
            println!("{}", outcome.id());
        }
        Command::Rename { id, node_id, label } => {
            let loaded = gateway.load(&id).await?;
            {
                let mut graph = gateway.graph().lock().await;
                rename_node(&mut graph, &node_id, label)?;
            }
            // Keep the diagram's stored name.
            gateway.save(&loaded.name).await?;
            print_tree(&*gateway.graph().lock().await);
        }
    }

    Ok(())
}

/// Branches a few children the way a canvas would: press a node's handle, release over
/// empty pane.
fn grow_demo_tree(graph: &mut Graph) -> Result<(), Box<dyn Error>> {
    let root_id = graph
        .root()
        .map(|root| root.id().clone())
        .ok_or("graph has no root")?;

    let first = branch(graph, &root_id, ScreenPoint::new(700.0, 180.0))?;
    branch(graph, &root_id, ScreenPoint::new(700.0, 420.0))?;
    if let Some(first) = first {
        branch(graph, &first, ScreenPoint::new(950.0, 180.0))?;
    }
    Ok(())
}

fn branch(
    graph: &mut Graph,
    parent_id: &NodeId,
    pointer: ScreenPoint,
) -> Result<Option<NodeId>, ApplyError> {
    let view = ViewTransform {
        x: 400.0,
        y: 300.0,
        zoom: 1.0,
    };
    let layouts = |node_id: &NodeId| {
        graph
            .absolute_position(node_id)
            .map(|at| NodeLayout::measured(at, DEMO_NODE_WIDTH, DEMO_NODE_HEIGHT))
    };

    let mut gesture = ConnectGesture::default();
    gesture.start(parent_id.clone());
    let release = GestureEnd {
        pointer,
        target: DropTarget::Pane,
    };
    let outcome = gesture.end(&release, ScreenPoint::default(), view, &layouts);

    Ok(outcome.apply(graph)?.map(|created| created.node_id))
}

fn print_tree(graph: &Graph) {
    fn walk(graph: &Graph, node: &Node, depth: usize) {
        println!("{}{} [{}]", "  ".repeat(depth), node.label(), node.id());
        for child in graph.children_of(node.id()) {
            walk(graph, child, depth + 1);
        }
    }

    if let Some(root) = graph.root() {
        walk(graph, root, 0);
    }
    for violation in graph.tree_violations() {
        println!("! {violation}");
    }
}
