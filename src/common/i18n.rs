// src/common/i18n.rs

use std::collections::HashMap;

// Mensagens que a API devolve para o usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mensagem {
    CamposObrigatorios,
    DemandaNaoEncontrada,
    DemandaRegistrada,
    DemandaAtualizada,
    StatusAtualizado,
    CorpoInvalido,
    PeriodoInvalido,
    StatusInvalido,
    ErroInterno,
    NenhumaDemandaEncontrada,
    NenhumaDemandaCritica,
}

#[derive(Debug, Clone)]
struct Traducao {
    pt: &'static str,
    en: &'static str,
}

/// Tabela imutável de traduções, montada uma vez e compartilhada pelo `AppState`.
#[derive(Debug, Clone)]
pub struct I18nStore {
    mensagens: HashMap<Mensagem, Traducao>,
}

impl I18nStore {
    pub fn new() -> Self {
        let entradas = [
            (Mensagem::CamposObrigatorios, "Preencha todos os campos obrigatórios", "Please fill in all required fields"),
            (Mensagem::DemandaNaoEncontrada, "Demanda não encontrada", "Complaint not found"),
            (Mensagem::DemandaRegistrada, "Demanda registrada com sucesso!", "Complaint registered successfully!"),
            (Mensagem::DemandaAtualizada, "Demanda atualizada com sucesso!", "Complaint updated successfully!"),
            (Mensagem::StatusAtualizado, "Status atualizado com sucesso!", "Status updated successfully!"),
            (Mensagem::CorpoInvalido, "Corpo da requisição inválido", "Invalid request body"),
            (Mensagem::PeriodoInvalido, "Período inválido", "Invalid period"),
            (Mensagem::StatusInvalido, "Status inválido", "Invalid status"),
            (Mensagem::ErroInterno, "Ocorreu um erro inesperado.", "An unexpected error occurred."),
            (
                Mensagem::NenhumaDemandaEncontrada,
                "Nenhuma demanda encontrada com os filtros selecionados.",
                "No complaints match the selected filters.",
            ),
            (
                Mensagem::NenhumaDemandaCritica,
                "Não há demandas críticas no momento.",
                "There are no critical complaints at the moment.",
            ),
        ];

        let mensagens = entradas
            .into_iter()
            .map(|(chave, pt, en)| (chave, Traducao { pt, en }))
            .collect();

        Self { mensagens }
    }

    /// Idiomas sem tradução caem no português.
    pub fn get(&self, lang: &str, mensagem: Mensagem) -> &'static str {
        match self.mensagens.get(&mensagem) {
            Some(t) if lang == "en" => t.en,
            Some(t) => t.pt,
            None => "",
        }
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
